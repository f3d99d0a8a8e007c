use crate::{
    base::{constants::Float, interaction::Interaction},
    geometries::{normal::Normal, point3::Point3, vec3::Vec3},
};

/// A scattering event inside a participating medium. Carries the asymmetry
/// parameter of the local phase function so the volumetric integrator can
/// importance-sample the next bounce direction.
#[derive(Debug, Clone, Copy)]
pub struct MediumInteraction {
    pub p: Point3,
    pub time: Float,
    pub wo: Vec3,
    pub g: Float,
}

impl Interaction for MediumInteraction {
    fn p(&self) -> Point3 {
        self.p
    }

    fn p_error(&self) -> Vec3 {
        Vec3::default()
    }

    fn time(&self) -> Float {
        self.time
    }

    fn wo(&self) -> Vec3 {
        self.wo
    }

    fn n(&self) -> Normal {
        Normal::default()
    }
}
