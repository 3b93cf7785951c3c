use quarry_blocks::FaceGeometry;
use quarry_geom::Vec3;

/// Triangle mesh buffers handed to the renderer.
#[derive(Default, Clone, Debug, PartialEq)]
pub struct MeshBuild {
    /// xyz per vertex.
    pub positions: Vec<f32>,
    /// `(u, v, layer)` per vertex.
    pub tex_coords: Vec<f32>,
    /// One shading scalar per vertex.
    pub shading: Vec<f32>,
    pub indices: Vec<u32>,
    vertex_count: u32,
}

/// Two triangles per quad.
const QUAD_INDICES: [u32; 6] = [0, 1, 2, 0, 2, 3];

impl MeshBuild {
    /// Clears all arrays but retains capacity for reuse.
    #[inline]
    pub fn clear_keep_capacity(&mut self) {
        self.positions.clear();
        self.tex_coords.clear();
        self.shading.clear();
        self.indices.clear();
        self.vertex_count = 0;
    }

    /// Pre-reserve capacity for approximately `n_quads` quads worth of data.
    #[inline]
    pub fn reserve_quads(&mut self, n_quads: usize) {
        self.positions.reserve(n_quads * 12);
        self.tex_coords.reserve(n_quads * 12);
        self.shading.reserve(n_quads * 4);
        self.indices.reserve(n_quads * 6);
    }

    /// Appends a model face translated to `origin`.
    pub fn add_face(&mut self, face: &FaceGeometry, origin: Vec3) {
        self.positions.extend_from_slice(&face.translated(origin));
        self.tex_coords.extend_from_slice(&face.tex_coords);
        self.shading.extend_from_slice(&face.shading);
        let base = self.vertex_count;
        self.indices.extend(QUAD_INDICES.iter().map(|i| base + i));
        self.vertex_count += 4;
    }

    /// Concatenates `other`, shifting its indices past the vertices already here.
    pub fn append_rebased(&mut self, other: &MeshBuild) {
        let base = self.vertex_count;
        self.positions.extend_from_slice(&other.positions);
        self.tex_coords.extend_from_slice(&other.tex_coords);
        self.shading.extend_from_slice(&other.shading);
        self.indices.extend(other.indices.iter().map(|i| base + i));
        self.vertex_count += other.vertex_count;
    }

    #[inline]
    pub fn vertex_count(&self) -> u32 {
        self.vertex_count
    }

    #[inline]
    pub fn index_count(&self) -> usize {
        self.indices.len()
    }

    #[inline]
    pub fn face_count(&self) -> usize {
        self.vertex_count as usize / 4
    }

    #[inline]
    pub fn is_empty(&self) -> bool {
        self.vertex_count == 0
    }

    /// Vertex positions of quad `i`.
    #[inline]
    pub fn quad_positions(&self, i: usize) -> &[f32] {
        &self.positions[i * 12..(i + 1) * 12]
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use quarry_blocks::BlockModel;

    #[test]
    fn add_face_offsets_indices() {
        let cube = BlockModel::cube();
        let mut m = MeshBuild::default();
        m.add_face(&cube.faces[0], Vec3::ZERO);
        m.add_face(&cube.faces[1], Vec3::new(2.0, 0.0, 0.0));
        assert_eq!(m.indices, vec![0, 1, 2, 0, 2, 3, 4, 5, 6, 4, 6, 7]);
        assert_eq!(m.positions.len(), 24);
        assert_eq!(m.tex_coords.len(), 24);
        assert_eq!(m.shading.len(), 8);
        assert_eq!(m.quad_positions(1)[0], 2.0);
    }

    #[test]
    fn append_rebases_second_mesh() {
        let cube = BlockModel::cube();
        let mut a = MeshBuild::default();
        a.add_face(&cube.faces[0], Vec3::ZERO);
        let mut b = MeshBuild::default();
        b.add_face(&cube.faces[2], Vec3::ZERO);
        b.add_face(&cube.faces[3], Vec3::ZERO);
        a.append_rebased(&b);
        assert_eq!(a.face_count(), 3);
        assert_eq!(&a.indices[6..], &[4, 5, 6, 4, 6, 7, 8, 9, 10, 8, 10, 11]);
        a.clear_keep_capacity();
        assert!(a.is_empty());
        assert!(a.indices.is_empty());
    }
}
