//! Static block geometry. Positions are in block-local space `[0, 1]^3` and
//! get translated by the integer block coordinate when meshed.

use quarry_geom::{Aabb, Vec3};
use serde::Deserialize;

use crate::face::Face;

/// UVs shared by every quad: `(u, v, layer)` per vertex, layer patched later.
pub const QUAD_TEX_COORDS: [f32; 12] = [
    0.0, 1.0, 0.0, //
    0.0, 0.0, 0.0, //
    1.0, 0.0, 0.0, //
    1.0, 1.0, 0.0,
];

/// One quad of a block model.
#[derive(Clone, Copy, Debug, PartialEq)]
pub struct FaceGeometry {
    /// 4 vertices, xyz each.
    pub positions: [f32; 12],
    /// 4 vertices, `(u, v, layer)` each.
    pub tex_coords: [f32; 12],
    pub shading: [f32; 4],
}

impl FaceGeometry {
    pub fn new(positions: [f32; 12], shading: f32) -> Self {
        Self {
            positions,
            tex_coords: QUAD_TEX_COORDS,
            shading: [shading; 4],
        }
    }

    /// Writes the atlas layer into the third texcoord component of every vertex.
    pub fn set_layer(&mut self, layer: f32) {
        for v in 0..4 {
            self.tex_coords[v * 3 + 2] = layer;
        }
    }

    #[inline]
    pub fn layer(&self) -> f32 {
        self.tex_coords[2]
    }

    /// Positions translated by `origin`.
    pub fn translated(&self, origin: Vec3) -> [f32; 12] {
        let mut out = self.positions;
        for v in 0..4 {
            out[v * 3] += origin.x;
            out[v * 3 + 1] += origin.y;
            out[v * 3 + 2] += origin.z;
        }
        out
    }
}

/// Quad lying on the plane perpendicular to `face` at coordinate `plane`,
/// spanning `lo..hi` along the two other axes.
pub fn face_quad(face: Face, plane: f32, lo: [f32; 3], hi: [f32; 3]) -> FaceGeometry {
    let [x0, y0, z0] = lo;
    let [x1, y1, z1] = hi;
    let p = plane;
    let positions = match face {
        Face::PosX => [p, y1, z1, p, y0, z1, p, y0, z0, p, y1, z0],
        Face::NegX => [p, y1, z0, p, y0, z0, p, y0, z1, p, y1, z1],
        Face::PosY => [x1, p, z1, x1, p, z0, x0, p, z0, x0, p, z1],
        Face::NegY => [x0, p, z1, x0, p, z0, x1, p, z0, x1, p, z1],
        Face::PosZ => [x0, y1, p, x0, y0, p, x1, y0, p, x1, y1, p],
        Face::NegZ => [x1, y1, p, x1, y0, p, x0, y0, p, x0, y1, p],
    };
    FaceGeometry::new(positions, face.shading())
}

/// Six faces of the box `lo..hi`, in `Face` order.
pub fn box_faces(lo: [f32; 3], hi: [f32; 3]) -> Vec<FaceGeometry> {
    Face::ALL
        .into_iter()
        .map(|f| {
            let axis = f.axis();
            let plane = if f.index() % 2 == 0 { hi[axis] } else { lo[axis] };
            face_quad(f, plane, lo, hi)
        })
        .collect()
}

/// Geometry family of a model. Only `Cube` participates in neighbour culling.
#[derive(Clone, Copy, Debug, PartialEq)]
pub enum Shape {
    Cube,
    Cross,
    Slab { height: f32 },
    Custom,
}

/// Named models available to block configuration.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum ModelName {
    Cube,
    Glass,
    Leaves,
    Plant,
    Cactus,
    Slab,
    PressurePlate,
    SnowLayer,
}

#[derive(Clone, Debug, PartialEq)]
pub struct BlockModel {
    pub shape: Shape,
    pub transparent: bool,
    /// Glass-like models hide faces shared with the same block id.
    pub glass: bool,
    pub faces: Vec<FaceGeometry>,
    /// Collision boxes in block-local space.
    pub colliders: Vec<Aabb>,
}

const FULL: Aabb = Aabb::new(Vec3::ZERO, Vec3::new(1.0, 1.0, 1.0));
const THIN: f32 = 0.0625;
const DIAG_LO: f32 = 0.5 - 0.3536;
const DIAG_HI: f32 = 0.5 + 0.3536;

impl BlockModel {
    pub fn named(name: ModelName) -> Self {
        match name {
            ModelName::Cube => Self::cube(),
            ModelName::Glass => Self::glass(),
            ModelName::Leaves => Self::leaves(),
            ModelName::Plant => Self::plant(),
            ModelName::Cactus => Self::cactus(),
            ModelName::Slab => Self::slab(),
            ModelName::PressurePlate => Self::pressure_plate(),
            ModelName::SnowLayer => Self::snow_layer(),
        }
    }

    pub fn cube() -> Self {
        Self {
            shape: Shape::Cube,
            transparent: false,
            glass: false,
            faces: box_faces([0.0; 3], [1.0; 3]),
            colliders: vec![FULL],
        }
    }

    pub fn glass() -> Self {
        Self {
            transparent: true,
            glass: true,
            ..Self::cube()
        }
    }

    pub fn leaves() -> Self {
        Self {
            transparent: true,
            ..Self::cube()
        }
    }

    /// Two crossed double-sided quads; no collision.
    pub fn plant() -> Self {
        let (a, b) = (DIAG_LO, DIAG_HI);
        let quads = [
            [a, 1.0, a, a, 0.0, a, b, 0.0, b, b, 1.0, b],
            [b, 1.0, b, b, 0.0, b, a, 0.0, a, a, 1.0, a],
            [a, 1.0, b, a, 0.0, b, b, 0.0, a, b, 1.0, a],
            [b, 1.0, a, b, 0.0, a, a, 0.0, b, a, 1.0, b],
        ];
        Self {
            shape: Shape::Cross,
            transparent: true,
            glass: false,
            faces: quads.into_iter().map(|q| FaceGeometry::new(q, 1.0)).collect(),
            colliders: Vec::new(),
        }
    }

    /// Full-height column with the four sides pulled in by 1/16.
    pub fn cactus() -> Self {
        let lo = [0.0; 3];
        let hi = [1.0; 3];
        let faces = Face::ALL
            .into_iter()
            .map(|f| {
                let positive = f.index() % 2 == 0;
                let plane = match (f.axis(), positive) {
                    (1, true) => 1.0,
                    (1, false) => 0.0,
                    (_, true) => 1.0 - THIN,
                    (_, false) => THIN,
                };
                face_quad(f, plane, lo, hi)
            })
            .collect();
        Self {
            shape: Shape::Custom,
            transparent: true,
            glass: false,
            faces,
            colliders: vec![Aabb::new(
                Vec3::new(THIN, 0.0, THIN),
                Vec3::new(1.0 - THIN, 1.0, 1.0 - THIN),
            )],
        }
    }

    pub fn slab() -> Self {
        let height = 0.5;
        Self {
            shape: Shape::Slab { height },
            transparent: true,
            glass: false,
            faces: box_faces([0.0; 3], [1.0, height, 1.0]),
            colliders: vec![Aabb::new(Vec3::ZERO, Vec3::new(1.0, height, 1.0))],
        }
    }

    /// A flat plate: top and bottom quads only, walk-through.
    pub fn pressure_plate() -> Self {
        Self {
            shape: Shape::Custom,
            transparent: true,
            glass: false,
            faces: flat_faces(THIN),
            colliders: Vec::new(),
        }
    }

    pub fn snow_layer() -> Self {
        Self {
            shape: Shape::Custom,
            transparent: true,
            glass: false,
            faces: flat_faces(THIN),
            colliders: vec![Aabb::new(Vec3::ZERO, Vec3::new(1.0, THIN, 1.0))],
        }
    }

    #[inline]
    pub fn is_cube(&self) -> bool {
        matches!(self.shape, Shape::Cube)
    }
}

fn flat_faces(height: f32) -> Vec<FaceGeometry> {
    let lo = [0.0; 3];
    let hi = [1.0; 3];
    let mut top = face_quad(Face::PosY, height, lo, hi);
    top.shading = [1.0; 4];
    let bottom = face_quad(Face::NegY, height, lo, hi);
    vec![top, bottom]
}
