use criterion::{black_box, criterion_group, criterion_main, Criterion};
use blockfall::core::{builtin_levels, Field, MoveSearch};
use blockfall::engine::{GameConfig, GameController, GameListener, NullAudio};
use blockfall::term::SceneBuffer;
use blockfall::types::PieceKind;

struct Quiet;

impl GameListener for Quiet {
    fn on_no_moves_left(&mut self) {}
    fn on_level_completed(&mut self, _num_stars: u8) {}
}

fn bench_collapse(c: &mut Criterion) {
    let mut rows = vec!["#.#.#.#.#.".to_owned(); 20];
    for y in [12, 15, 16, 19] {
        rows[y] = "##########".to_owned();
    }
    let field = Field::from_ascii(&rows).unwrap();

    c.bench_function("collapse_4_rows", |b| {
        b.iter(|| {
            let mut f = field.clone();
            let full = f.detect_full_rows();
            black_box(f.collapse_rows(full));
        })
    });
}

fn bench_move_search(c: &mut Criterion) {
    let field = Field::from_ascii(&[
        "........", //
        "........", //
        "........", //
        "........", //
        "........", //
        "........", //
        "#.......", //
        "##....#.", //
        "###..###", //
        "####.###", //
    ])
    .unwrap();
    let search = MoveSearch::default();

    c.bench_function("best_move_t", |b| {
        b.iter(|| black_box(search.best_move(black_box(&field), PieceKind::T)))
    });
    c.bench_function("best_move_pyramid", |b| {
        b.iter(|| black_box(search.best_move(black_box(&field), PieceKind::Pyramid)))
    });
}

fn bench_controller_frame(c: &mut Criterion) {
    let mut controller = GameController::new(&builtin_levels()[1], GameConfig::default()).unwrap();
    controller.start();
    let mut scene = SceneBuffer::new();

    c.bench_function("controller_frame_16ms", |b| {
        b.iter(|| {
            controller.frame(black_box(0.016), &mut scene, &mut NullAudio, &mut Quiet);
            if controller.logic().is_terminal() {
                controller.restart();
            }
        })
    });
}

criterion_group!(benches, bench_collapse, bench_move_search, bench_controller_frame);
criterion_main!(benches);
