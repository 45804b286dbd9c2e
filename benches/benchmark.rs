use criterion::{criterion_group, criterion_main, Criterion};

use cleaning_bot::beam_search::BeamParams;
use cleaning_bot::game_interface::Pos;
use cleaning_bot::grid::Grid;
use cleaning_bot::pathfinding::path_home;
use cleaning_bot::simple_beam_search::SimpleBeamSearchSolver;
use cleaning_bot::solvers::{BeamSearchSolver, Solver};


fn make_grid() -> Grid {
    Grid::random(30, 0.2, 35334)
}

fn bench_beam_search(c: &mut Criterion) {
    let grid = make_grid();
    let params = BeamParams { width: 40, depth: 2000 };
    let mut group = c.benchmark_group("beam_search");
    group.bench_function("simple beam search", |b| b.iter(|| {
        SimpleBeamSearchSolver::new(params).do_solve(&grid)
    }));
    group.bench_function("pooled beam search", |b| b.iter(|| {
        BeamSearchSolver::new(params).do_solve(&grid)
    }));
    group.finish();
}

fn bench_path_home(c: &mut Criterion) {
    let grid = make_grid();
    let far = Pos::new(grid.size() - 1, grid.size() - 1);
    c.bench_function("path_home", |b| b.iter(|| path_home(&grid, far)));
}

criterion_group!{
    name = benches;
    // Limit sample size given the slow processing. Results will be noisy.
    config = Criterion::default().sample_size(20);
    targets = bench_beam_search, bench_path_home,
}
criterion_main!(benches);
