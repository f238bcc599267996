use std::f32::consts::{FRAC_PI_2, PI, TAU};

// Floats per vertex: position (3), shade (3), texture coordinate (2).
pub const VERTEX_STRIDE: usize = 8;

#[derive(Clone, Debug, Default)]
pub struct Mesh {
    pub vertices: Vec<f32>,
    pub indices: Vec<u16>,
}

impl Mesh {
    pub fn vertex_count(&self) -> usize {
        self.vertices.len() / VERTEX_STRIDE
    }

    #[cfg(test)]
    pub fn triangle_count(&self) -> usize {
        self.indices.len() / 3
    }

    #[cfg(test)]
    pub fn position(&self, index: usize) -> [f32; 3] {
        let base = index * VERTEX_STRIDE;
        [self.vertices[base], self.vertices[base + 1], self.vertices[base + 2]]
    }

    fn push_vertex(&mut self, position: [f32; 3], brightness: f32, uv: [f32; 2]) -> u16 {
        let index = self.vertex_count() as u16;
        self.vertices.extend_from_slice(&[
            position[0], position[1], position[2],
            brightness, brightness, brightness,
            uv[0], uv[1],
        ]);
        index
    }

    fn push_strip(&mut self, first: u16, count: usize) {
        for i in 0..count.saturating_sub(2) {
            let i = first + i as u16;
            if (i - first) % 2 == 0 {
                self.indices.extend_from_slice(&[i, i + 1, i + 2]);
            } else {
                self.indices.extend_from_slice(&[i + 1, i, i + 2]);
            }
        }
    }

    fn push_fan(&mut self, centre: u16, first: u16, count: usize) {
        for i in 0..count.saturating_sub(1) {
            let i = first + i as u16;
            self.indices.extend_from_slice(&[centre, i, i + 1]);
        }
    }

    fn push_rim(&mut self, radius: f32, z: f32, slices: u16, brightness: f32) -> u16 {
        let first = self.vertex_count() as u16;
        for i in 0..=slices {
            let angle = TAU * f32::from(i) / f32::from(slices);
            self.push_vertex(
                [radius * angle.cos(), radius * angle.sin(), z],
                brightness,
                [0.0, 0.0],
            );
        }
        first
    }

    pub fn cuboid(width: f32, height: f32, depth: f32) -> Self {
        let (w, h, d) = (width / 2.0, height / 2.0, depth / 2.0);
        let corners = [
            [-w, -h, d], [w, -h, d], [w, h, d], [-w, h, d],
            [-w, -h, -d], [w, -h, -d], [w, h, -d], [-w, h, -d],
        ];
        // front, back, left, right, top, bottom
        let faces: [([usize; 4], f32); 6] = [
            ([0, 1, 2, 3], 0.9),
            ([5, 4, 7, 6], 0.7),
            ([4, 0, 3, 7], 0.6),
            ([1, 5, 6, 2], 0.8),
            ([3, 2, 6, 7], 1.1),
            ([4, 5, 1, 0], 0.4),
        ];
        let uvs = [[0.0, 0.0], [1.0, 0.0], [1.0, 1.0], [0.0, 1.0]];

        let mut mesh = Mesh::default();
        for (face, brightness) in faces {
            let base = mesh.vertex_count() as u16;
            for (corner, uv) in face.iter().zip(uvs) {
                mesh.push_vertex(corners[*corner], brightness, uv);
            }
            mesh.indices.extend_from_slice(&[
                base, base + 1, base + 2,
                base, base + 2, base + 3,
            ]);
        }
        mesh
    }

    // Cylinder along local Z, centred on the origin.
    pub fn cylinder(radius: f32, height: f32, slices: u16) -> Self {
        let mut mesh = Mesh::default();
        let half = height / 2.0;

        let first = mesh.vertex_count() as u16;
        for i in 0..=slices {
            let angle = TAU * f32::from(i) / f32::from(slices);
            let (x, y) = (radius * angle.cos(), radius * angle.sin());
            mesh.push_vertex([x, y, -half], 0.85, [0.0, 0.0]);
            mesh.push_vertex([x, y, half], 0.85, [0.0, 0.0]);
        }
        mesh.push_strip(first, 2 * (usize::from(slices) + 1));

        for z in [-half, half] {
            let centre = mesh.push_vertex([0.0, 0.0, z], 1.0, [0.0, 0.0]);
            let rim = mesh.push_rim(radius, z, slices, 1.0);
            mesh.push_fan(centre, rim, usize::from(slices) + 1);
        }
        mesh
    }

    pub fn sphere(radius: f32, slices: u16, stacks: u16) -> Self {
        let mut mesh = Mesh::default();
        for i in 0..stacks {
            let lat0 = PI * (-0.5 + f32::from(i) / f32::from(stacks));
            let lat1 = PI * (-0.5 + f32::from(i + 1) / f32::from(stacks));
            let (z0, r0) = (lat0.sin() * radius, lat0.cos() * radius);
            let (z1, r1) = (lat1.sin() * radius, lat1.cos() * radius);
            // lighter towards the top
            let shade0 = 0.7 + 0.3 * (lat0 + FRAC_PI_2) / PI;
            let shade1 = 0.7 + 0.3 * (lat1 + FRAC_PI_2) / PI;

            let first = mesh.vertex_count() as u16;
            for j in 0..=slices {
                let lon = TAU * f32::from(j) / f32::from(slices);
                let (x, y) = (lon.cos(), lon.sin());
                mesh.push_vertex([x * r0, y * r0, z0], shade0, [0.0, 0.0]);
                mesh.push_vertex([x * r1, y * r1, z1], shade1, [0.0, 0.0]);
            }
            mesh.push_strip(first, 2 * (usize::from(slices) + 1));
        }
        mesh
    }

    // Cone with its base on z = 0 and apex at z = `height`.
    pub fn cone(base_radius: f32, height: f32, slices: u16) -> Self {
        let mut mesh = Mesh::default();

        let apex = mesh.push_vertex([0.0, 0.0, height], 1.0, [0.0, 0.0]);
        let rim = mesh.push_rim(base_radius, 0.0, slices, 0.8);
        mesh.push_fan(apex, rim, usize::from(slices) + 1);

        let centre = mesh.push_vertex([0.0, 0.0, 0.0], 0.6, [0.0, 0.0]);
        let rim = mesh.push_rim(base_radius, 0.0, slices, 0.6);
        mesh.push_fan(centre, rim, usize::from(slices) + 1);
        mesh
    }

    pub fn plane(x0: f32, x1: f32, z0: f32, z1: f32) -> Self {
        let mut mesh = Mesh::default();
        mesh.push_vertex([x0, 0.0, z0], 1.0, [0.0, 0.0]);
        mesh.push_vertex([x1, 0.0, z0], 1.0, [1.0, 0.0]);
        mesh.push_vertex([x1, 0.0, z1], 1.0, [1.0, 1.0]);
        mesh.push_vertex([x0, 0.0, z1], 1.0, [0.0, 1.0]);
        mesh.indices.extend_from_slice(&[0, 1, 2, 0, 2, 3]);
        mesh
    }

    pub fn overlay_quad() -> Self {
        let mut mesh = Mesh::default();
        mesh.push_vertex([0.0, 0.0, 0.0], 1.0, [0.0, 1.0]);
        mesh.push_vertex([1.0, 0.0, 0.0], 1.0, [1.0, 1.0]);
        mesh.push_vertex([1.0, 1.0, 0.0], 1.0, [1.0, 0.0]);
        mesh.push_vertex([0.0, 1.0, 0.0], 1.0, [0.0, 0.0]);
        mesh.indices.extend_from_slice(&[0, 1, 2, 0, 2, 3]);
        mesh
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn assert_indices_in_range(mesh: &Mesh) {
        let count = mesh.vertex_count();
        assert!(mesh.indices.iter().all(|&i| (i as usize) < count));
        assert_eq!(mesh.indices.len() % 3, 0);
    }

    fn extent(mesh: &Mesh, axis: usize) -> (f32, f32) {
        (0..mesh.vertex_count())
            .map(|i| mesh.position(i)[axis])
            .fold((f32::MAX, f32::MIN), |(lo, hi), v| (lo.min(v), hi.max(v)))
    }

    #[test]
    fn test_cuboid_is_centred_with_six_faces() {
        let mesh = Mesh::cuboid(1.5, 1.0, 3.0);
        assert_eq!(mesh.vertex_count(), 24);
        assert_eq!(mesh.triangle_count(), 12);
        assert_indices_in_range(&mesh);
        assert_eq!(extent(&mesh, 0), (-0.75, 0.75));
        assert_eq!(extent(&mesh, 1), (-0.5, 0.5));
        assert_eq!(extent(&mesh, 2), (-1.5, 1.5));
    }

    #[test]
    fn test_cylinder_wall_and_caps() {
        let mesh = Mesh::cylinder(0.4, 0.3, 16);
        // wall pairs plus two caps of centre + rim
        assert_eq!(mesh.vertex_count(), 2 * 17 + 2 * 18);
        assert_eq!(mesh.triangle_count(), 4 * 16);
        assert_indices_in_range(&mesh);

        let (lo, hi) = extent(&mesh, 2);
        assert!((lo + 0.15).abs() < 1e-6);
        assert!((hi - 0.15).abs() < 1e-6);
        for i in 0..mesh.vertex_count() {
            let [x, y, _] = mesh.position(i);
            assert!((x * x + y * y).sqrt() <= 0.4 + 1e-5);
        }
    }

    #[test]
    fn test_sphere_vertices_lie_on_radius() {
        let mesh = Mesh::sphere(0.3, 16, 16);
        assert_eq!(mesh.vertex_count(), 16 * 2 * 17);
        assert_eq!(mesh.triangle_count(), 16 * 2 * 16);
        assert_indices_in_range(&mesh);
        for i in 0..mesh.vertex_count() {
            let [x, y, z] = mesh.position(i);
            assert!(((x * x + y * y + z * z).sqrt() - 0.3).abs() < 1e-5);
        }
        let (lo, hi) = extent(&mesh, 2);
        assert!((lo + 0.3).abs() < 1e-5 && (hi - 0.3).abs() < 1e-5);
    }

    #[test]
    fn test_cone_apex_and_base() {
        let mesh = Mesh::cone(1.0, 2.0, 8);
        assert_eq!(mesh.position(0), [0.0, 0.0, 2.0]);
        assert_eq!(mesh.triangle_count(), 16);
        assert_indices_in_range(&mesh);
        assert_eq!(extent(&mesh, 2), (0.0, 2.0));
    }

    #[test]
    fn test_zero_slices_emits_no_triangles() {
        let mesh = Mesh::cone(1.0, 2.0, 0);
        assert_eq!(mesh.triangle_count(), 0);
    }

    #[test]
    fn test_plane_spans_requested_band() {
        let mesh = Mesh::plane(-5.0, 5.0, -500.0, 100.0);
        assert_eq!(mesh.vertex_count(), 4);
        assert_eq!(extent(&mesh, 0), (-5.0, 5.0));
        assert_eq!(extent(&mesh, 1), (0.0, 0.0));
        assert_eq!(extent(&mesh, 2), (-500.0, 100.0));
    }
}
