use std::sync::Arc;

use itertools::partition;
use rayon::prelude::*;

use crate::{
    base::{
        constants::Float,
        light::AreaLight,
        material::{Material, TransportMode},
        primitive::Primitive,
    },
    geometries::{bounds3::Bounds3, point3::Point3, ray::Ray, vec3::Vec3},
    interactions::surface::SurfaceInteraction,
};

/// Bounding volume hierarchy accelerator. See [`crate::accelerators::qbvh`]
/// for the quantized, SIMD-friendlier variant.

const MAX_PRIMITIVES_IN_NODE: usize = 256;
const PARTITION_BUCKET_SIZE: usize = 16;

pub struct BVH {
    primitives: Vec<Arc<dyn Primitive>>,
    nodes: Vec<BVHNode>,
}

struct BVHNode {
    bounds: Bounds3,
    primitive_offset: usize,
    second_child_offset: usize,
    count: usize,
    axis: usize,
}

struct BVHPrimitiveInfo {
    index: usize,
    bounds: Bounds3,
    centroid: Point3,
}

pub(crate) struct BVHBuildNode {
    pub(crate) bounds: Bounds3,
    pub(crate) children: Box<[BVHBuildNode]>,
    pub(crate) split_axis: usize,
    pub(crate) offset: usize,
    pub(crate) count: usize,
}

struct BucketInfo {
    count: Float,
    bounds: Bounds3,
}

impl BVH {
    pub fn new(primitives: Vec<Arc<dyn Primitive>>) -> Self {
        if primitives.is_empty() {
            return Self {
                primitives,
                nodes: vec![],
            };
        }

        let (root, ordered_primitives) = Self::build_tree(&primitives);
        let total_nodes = root.count_nodes();

        let mut nodes: Vec<BVHNode> = Vec::with_capacity(total_nodes);
        unsafe { nodes.set_len(total_nodes) }

        let offset = &mut 0;
        Self::flatten(&mut nodes, &root, offset);
        debug_assert_eq!(total_nodes, *offset);

        Self {
            primitives: ordered_primitives,
            nodes,
        }
    }

    /// Runs the SAH build but returns the unflattened tree, so other
    /// accelerators (the four-wide QBVH) can collapse it differently
    /// instead of consuming the stack-walk `BVHNode` layout.
    pub(crate) fn build_tree(
        primitives: &[Arc<dyn Primitive>],
    ) -> (BVHBuildNode, Vec<Arc<dyn Primitive>>) {
        let mut primitive_info: Vec<BVHPrimitiveInfo> = primitives
            .par_iter()
            .enumerate()
            .map(|(i, p)| BVHPrimitiveInfo::new(i, p.world_bound()))
            .collect();

        let mut total_nodes = 0;
        let mut ordered_primitives: Vec<Arc<dyn Primitive>> = Vec::with_capacity(primitives.len());
        let root = Self::build(
            primitives,
            &mut primitive_info,
            &mut total_nodes,
            &mut ordered_primitives,
        );

        (root, ordered_primitives)
    }

    fn build(
        primitives: &[Arc<dyn Primitive>],
        primitive_info: &mut [BVHPrimitiveInfo],
        count: &mut usize,
        ordered_primitives: &mut Vec<Arc<dyn Primitive>>,
    ) -> BVHBuildNode {
        debug_assert_ne!(primitive_info.len(), 0);

        let mut node = BVHBuildNode::default();
        *count += 1;

        // Compute bounds of all primitives in BVH node.
        let mut bounds = Bounds3::default();
        for p in primitive_info.iter() {
            bounds.union_mut(&p.bounds);
        }

        let size = primitive_info.len();
        if size == 1 {
            // Create leaf node.
            let node_offset = ordered_primitives.len();
            let index = primitive_info[0].index;

            ordered_primitives.push(primitives[index].clone());
            node.init_leaf(node_offset, size, &bounds);

            return node;
        } else {
            // Compute bound of primitive centroids, choose split dimension.
            let mut centroid_bounds = Bounds3::default();
            for p in primitive_info.iter() {
                centroid_bounds.union_point_mut(&p.centroid);
            }
            let dim = centroid_bounds.maximum_extent();

            // Partition primitives into two sets and build children.
            if centroid_bounds.max[dim] == centroid_bounds.min[dim] {
                // Create leaf node.
                let node_offset = ordered_primitives.len();

                for p in primitive_info.iter() {
                    ordered_primitives.push(primitives[p.index].clone());
                }

                node.init_leaf(node_offset, size, &bounds);

                return node;
            } else {
                let mut mid = primitive_info.len() / 2;

                // Partition primitives using approximate SAH.
                if size <= 2 {
                    // Partition primitives into equally-sized subsets.
                    primitive_info.select_nth_unstable_by(mid, |a, b| {
                        a.centroid[dim].total_cmp(&b.centroid[dim])
                    });
                } else {
                    // Allocate bucket info for SAH partition buckets.
                    let mut buckets: Vec<BucketInfo> = Vec::with_capacity(PARTITION_BUCKET_SIZE);
                    unsafe { buckets.set_len(PARTITION_BUCKET_SIZE) }

                    // Initialize bucket info for SAH partition buckets.
                    for p in primitive_info.iter() {
                        let mut b = PARTITION_BUCKET_SIZE
                            * centroid_bounds.offset(&p.centroid)[dim] as usize;
                        if b == PARTITION_BUCKET_SIZE {
                            b = PARTITION_BUCKET_SIZE - 1;
                        }

                        debug_assert!(b < PARTITION_BUCKET_SIZE);

                        buckets[b].count += 1.0;
                        buckets[b].bounds.union_mut(&p.bounds);
                    }

                    // Compute costs for splitting after each bucket.
                    let mut cost = vec![0.0; PARTITION_BUCKET_SIZE - 1].into_boxed_slice();
                    for i in 0..(PARTITION_BUCKET_SIZE - 1) {
                        let mut b0 = Bounds3::default();
                        let mut b1 = Bounds3::default();
                        let mut count0 = 0.0;
                        let mut count1 = 0.0;

                        for j in 0..=i {
                            b0.union_mut(&buckets[j].bounds);
                            count0 += buckets[j].count;
                        }
                        for j in (i + 1)..PARTITION_BUCKET_SIZE {
                            b1.union_mut(&buckets[j].bounds);
                            count1 += buckets[j].count;
                        }

                        cost[i] = 1.0
                            + (count0 * b0.surface_area() + count1 * b1.surface_area())
                                / bounds.surface_area();
                    }

                    // Find bucket to split at that minimizes SAH metric.
                    let mut min_cost = cost[0];
                    let mut min_cost_split_bucket = 0;

                    for i in 1..(PARTITION_BUCKET_SIZE - 1) {
                        if cost[i] < min_cost {
                            min_cost = cost[i];
                            min_cost_split_bucket = i;
                        }
                    }

                    // Either create leaf or split primitives at selected SAH bucket.
                    let leaf_cost = size as Float;
                    if size > MAX_PRIMITIVES_IN_NODE || min_cost < leaf_cost {
                        mid = partition(primitive_info.iter_mut(), |pi| {
                            let mut b = PARTITION_BUCKET_SIZE
                                * centroid_bounds.offset(&pi.centroid)[dim] as usize;

                            if b == PARTITION_BUCKET_SIZE {
                                b = PARTITION_BUCKET_SIZE - 1;
                            }

                            debug_assert!(b < PARTITION_BUCKET_SIZE);

                            b <= min_cost_split_bucket
                        });
                    } else {
                        // Create leaf node.
                        let prim_offset = ordered_primitives.len();

                        for p in primitive_info.iter() {
                            ordered_primitives.push(primitives[p.index].clone());
                        }

                        node.init_leaf(prim_offset, size, &bounds);

                        return node;
                    }
                }

                node.init_interior(
                    dim,
                    Self::build(
                        primitives,
                        &mut primitive_info[..mid],
                        count,
                        ordered_primitives,
                    ),
                    Self::build(
                        primitives,
                        &mut primitive_info[mid..],
                        count,
                        ordered_primitives,
                    ),
                );
            }
        }

        node
    }

    fn flatten(nodes: &mut [BVHNode], node: &BVHBuildNode, offset: &mut usize) -> usize {
        nodes[*offset].bounds = node.bounds;

        let current_offset = *offset;
        *offset += 1;

        if node.count > 0 {
            debug_assert!(node.children.len() == 0);
            nodes[current_offset].primitive_offset = node.offset;
            nodes[current_offset].count = node.count;
        } else {
            // Create interior flattened BVH node
            nodes[current_offset].axis = node.split_axis;
            nodes[current_offset].count = 0;
            Self::flatten(nodes, &node.children[0], offset);
            nodes[current_offset].second_child_offset =
                Self::flatten(nodes, &node.children[1], offset);
        }

        current_offset
    }
}

impl Primitive for BVH {
    fn world_bound(&self) -> Bounds3 {
        if self.nodes.is_empty() {
            Bounds3::default()
        } else {
            self.nodes[0].bounds
        }
    }

    fn intersect(&self, ray: &mut Ray, si: &mut SurfaceInteraction) -> bool {
        if self.nodes.is_empty() {
            return false;
        }

        let mut hit = false;
        let inv_dir = ray.inv_direction();
        let is_neg_dir = [
            (inv_dir.x < 0.0) as usize,
            (inv_dir.y < 0.0) as usize,
            (inv_dir.z < 0.0) as usize,
        ];

        // Follow ray through BVH nodes to find primitive intersections.
        let mut to_visit_offset = 0;
        let mut current_node_index = 0;
        let mut nodes_to_visit = vec![0; 64];

        loop {
            if to_visit_offset >= nodes_to_visit.len() {
                nodes_to_visit.append(&mut vec![0; 64]);
            }

            let node = &self.nodes[current_node_index];

            if node
                .bounds
                .intersect_range_precomputed(ray, &inv_dir, is_neg_dir)
            {
                if node.count > 0 {
                    // Intersect ray with primitives in leaf BVH node.
                    for i in 0..node.count {
                        let primitive = &self.primitives[node.primitive_offset + i];
                        if primitive.intersect(ray, si) {
                            si.primitive = Some(primitive.clone());
                            hit = true;
                        }
                    }

                    if to_visit_offset == 0 {
                        break;
                    }

                    to_visit_offset -= 1;
                    current_node_index = nodes_to_visit[to_visit_offset];
                } else {
                    // Put far BVH node on stack and advance to near node.
                    if is_neg_dir[node.axis] != 0 {
                        nodes_to_visit[to_visit_offset] = current_node_index + 1;
                        current_node_index = node.second_child_offset;
                    } else {
                        nodes_to_visit[to_visit_offset] = node.second_child_offset;
                        current_node_index += 1;
                    }

                    to_visit_offset += 1;
                }
            } else {
                if to_visit_offset == 0 {
                    break;
                }

                to_visit_offset -= 1;
                current_node_index = nodes_to_visit[to_visit_offset];
            }
        }

        hit
    }

    fn intersect_test(&self, ray: &Ray) -> bool {
        if self.nodes.is_empty() {
            return false;
        }

        let inv_dir = ray.inv_direction();
        let is_neg_dir = [
            (inv_dir.x < 0.0) as usize,
            (inv_dir.y < 0.0) as usize,
            (inv_dir.z < 0.0) as usize,
        ];

        // Follow ray through BVH nodes to find primitive intersections.
        let mut to_visit_offset = 0;
        let mut current_node_index = 0;
        let mut nodes_to_visit = vec![0; 64];

        loop {
            if to_visit_offset >= nodes_to_visit.len() {
                nodes_to_visit.append(&mut vec![0; 64]);
            }

            let node = &self.nodes[current_node_index];

            if node
                .bounds
                .intersect_range_precomputed(ray, &inv_dir, is_neg_dir)
            {
                if node.count > 0 {
                    // Intersect ray with primitives in leaf BVH node.
                    for i in 0..node.count {
                        if self.primitives[node.primitive_offset + i].intersect_test(ray) {
                            return true;
                        }
                    }

                    if to_visit_offset == 0 {
                        break;
                    }

                    to_visit_offset -= 1;
                    current_node_index = nodes_to_visit[to_visit_offset];
                } else {
                    // Put far BVH node on stack and advance to near node.
                    if is_neg_dir[node.axis] != 0 {
                        nodes_to_visit[to_visit_offset] = current_node_index + 1;
                        current_node_index = node.second_child_offset;
                    } else {
                        nodes_to_visit[to_visit_offset] = node.second_child_offset;
                        current_node_index += 1;
                    }

                    to_visit_offset += 1;
                }
            } else {
                if to_visit_offset == 0 {
                    break;
                }

                to_visit_offset -= 1;
                current_node_index = nodes_to_visit[to_visit_offset];
            }
        }

        false
    }

    fn compute_scattering_functions(
        &self,
        _si: &mut SurfaceInteraction,
        _transport_mode: TransportMode,
        _allow_multiple_lobes: bool,
    ) {
        unimplemented!();
    }

    fn material(&self) -> Option<&dyn Material> {
        None
    }

    fn area_light(&self) -> Option<Arc<dyn AreaLight>> {
        None
    }
}

impl crate::base::aggregate::Aggregate for BVH {}

impl BVHPrimitiveInfo {
    pub fn new(index: usize, bounds: Bounds3) -> Self {
        Self {
            index,
            bounds,
            centroid: 0.5 * bounds.min + 0.5 * bounds.max,
        }
    }
}

impl BVHBuildNode {
    pub(crate) fn is_leaf(&self) -> bool {
        self.children.is_empty()
    }

    pub(crate) fn count_nodes(&self) -> usize {
        1 + self.children.iter().map(Self::count_nodes).sum::<usize>()
    }

    pub fn init_leaf(&mut self, offset: usize, num_prims: usize, bounds: &Bounds3) {
        self.offset = offset;
        self.count = num_prims;
        self.bounds = bounds.clone();
    }

    pub fn init_interior(&mut self, split_axis: usize, c0: Self, c1: Self) {
        self.split_axis = split_axis;
        self.bounds = c0.bounds.union(&c1.bounds);
        self.children = vec![c0, c1].into_boxed_slice();
    }
}

impl Default for BVHNode {
    fn default() -> Self {
        Self {
            bounds: Bounds3::default(),
            primitive_offset: 0,
            second_child_offset: 0,
            count: 0,
            axis: 0,
        }
    }
}

impl Default for BVHBuildNode {
    fn default() -> Self {
        Self {
            bounds: Bounds3::default(),
            children: Vec::new().into_boxed_slice(),
            split_axis: 0,
            offset: 0,
            count: 0,
        }
    }
}

impl Default for BucketInfo {
    fn default() -> Self {
        Self {
            count: 0.0,
            bounds: Bounds3::default(),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::{
        materials::matte::MatteMaterial,
        primitives::geometric::GeometricPrimitive,
        shapes::sphere::{Sphere, SphereOptions},
        spectra::rgb::RGBSpectrum,
        textures::constant::ConstantTexture,
        base::transform::Transform,
    };

    fn unit_sphere_at(center: Vec3) -> Arc<dyn Primitive> {
        let shape = Arc::new(Sphere::new(SphereOptions {
            transform: Transform::translate(&center),
            reverse_orientation: false,
            radius: 1.0,
            z_min: -1.0,
            z_max: 1.0,
            phi_max: 360.0,
        }));
        let material = Arc::new(MatteMaterial {
            kd: Box::new(ConstantTexture {
                value: RGBSpectrum::new(0.5),
            }),
            sigma: Box::new(ConstantTexture { value: 0.0 }),
        });
        Arc::new(GeometricPrimitive {
            shape,
            material,
            area_light: None,
        })
    }

    /// Every leaf's bounds must contain every primitive bound folded into
    /// it, all the way up to the root.
    #[test]
    fn world_bound_contains_every_primitive() {
        let primitives: Vec<Arc<dyn Primitive>> = (0..20)
            .map(|i| unit_sphere_at(Vec3::new(i as Float * 2.5, 0.0, 0.0)))
            .collect();
        let prim_bounds: Vec<Bounds3> = primitives.iter().map(|p| p.world_bound()).collect();
        let bvh = BVH::new(primitives);
        let root_bounds = bvh.world_bound();

        for b in &prim_bounds {
            assert!(
                Bounds3::union_bound(&root_bounds, b) == root_bounds,
                "root bounds do not contain a primitive bound"
            );
        }
    }

    /// Accelerator soundness: intersecting through the BVH must agree with
    /// intersecting the same primitive directly, for both hits and misses.
    #[test]
    fn bvh_intersection_agrees_with_brute_force() {
        let centers: Vec<Vec3> = (0..8).map(|i| Vec3::new(i as Float * 3.0, 0.0, 0.0)).collect();
        let primitives: Vec<Arc<dyn Primitive>> =
            centers.iter().map(|&c| unit_sphere_at(c)).collect();
        let bvh = BVH::new(primitives.clone());

        for &c in &centers {
            let origin = Point3::new(c.x, 0.0, 5.0);
            let direction = Vec3::new(0.0, 0.0, -1.0);

            let mut ray_bvh = Ray::new(&origin, &direction, Float::INFINITY, 0.0);
            let mut si_bvh = SurfaceInteraction::default();
            let hit_bvh = bvh.intersect(&mut ray_bvh, &mut si_bvh);

            let mut hit_brute = false;
            let mut best_t = Float::INFINITY;
            for p in &primitives {
                let mut ray = Ray::new(&origin, &direction, Float::INFINITY, 0.0);
                let mut si = SurfaceInteraction::default();
                if p.intersect(&mut ray, &mut si) && ray.t_max < best_t {
                    best_t = ray.t_max;
                    hit_brute = true;
                }
            }

            assert_eq!(hit_bvh, hit_brute, "disagreement at center {c:?}");
            if hit_bvh && hit_brute {
                assert!((ray_bvh.t_max - best_t).abs() < 1e-4);
            }
        }

        // A ray that passes well above every sphere must miss entirely.
        let origin = Point3::new(0.0, 10.0, 5.0);
        let direction = Vec3::new(0.0, 0.0, -1.0);
        let mut ray = Ray::new(&origin, &direction, Float::INFINITY, 0.0);
        let mut si = SurfaceInteraction::default();
        assert!(!bvh.intersect(&mut ray, &mut si));
    }

    /// Every interior node's bounds must contain both of its children's
    /// bounds, all the way down the flattened stack-walk layout.
    #[test]
    fn interior_node_bounds_contain_children() {
        let primitives: Vec<Arc<dyn Primitive>> = (0..40)
            .map(|i| unit_sphere_at(Vec3::new(i as Float * 1.3, (i as Float * 0.4).sin() * 5.0, 0.0)))
            .collect();
        let bvh = BVH::new(primitives);

        for (index, node) in bvh.nodes.iter().enumerate() {
            if node.count > 0 {
                continue;
            }
            let left = &bvh.nodes[index + 1];
            let right = &bvh.nodes[node.second_child_offset];
            for child in [left, right] {
                assert!(
                    Bounds3::union_bound(&node.bounds, &child.bounds) == node.bounds,
                    "interior node at {index} does not contain a child's bounds"
                );
            }
        }
    }
}
