use criterion::{Criterion, black_box, criterion_group, criterion_main};

use quarry_blocks::{BlockRegistry, FaceSelector, ModelName};
use quarry_chunk::{Chunk, ChunkCoord, GridDims, SubchunkLayout};
use quarry_mesh_cpu::ChunkMesh;

fn registry() -> BlockRegistry {
    let mut reg = BlockRegistry::new();
    reg.insert(1, "stone", ModelName::Cube, &[(FaceSelector::All, "stone")])
        .unwrap();
    reg.insert(2, "grass", ModelName::Cube, &[(FaceSelector::All, "grass")])
        .unwrap();
    reg
}

fn layered_chunk(height: usize) -> Chunk {
    let mut chunk = Chunk::new(ChunkCoord::new(0, 0, 0), GridDims::CHUNK);
    for x in 0..16 {
        for z in 0..16 {
            // Uneven surface so the mesher sees exposed sides.
            let top = height + (x * 7 + z * 3) % 5;
            for y in 0..top {
                chunk.set_local(x, y, z, if y + 1 == top { 2 } else { 1 });
            }
        }
    }
    chunk
}

fn bench_chunk_mesh(c: &mut Criterion) {
    let reg = registry();
    let mut group = c.benchmark_group("chunk_mesh");
    for height in [8usize, 64] {
        let chunk = layered_chunk(height);
        group.bench_function(format!("16x128x16_h{height}"), |b| {
            b.iter(|| {
                let mesh = ChunkMesh::build(&chunk, SubchunkLayout::default(), &chunk, &reg);
                black_box(mesh.mesh().face_count());
            })
        });
    }
    group.finish();
}

criterion_group!(benches, bench_chunk_mesh);
criterion_main!(benches);
