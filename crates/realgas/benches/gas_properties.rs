use criterion::measurement::WallTime;
use criterion::{criterion_group, criterion_main, BenchmarkGroup, Criterion};
use realgas::{CubicKind, Fluid, Gas, GasModel, GasResult};
use std::hint::black_box;

/// Benchmark `f` at temperatures that change with every call, so that no
/// cached value is reused.
fn bench_property<F>(
    group: &mut BenchmarkGroup<'_, WallTime>,
    name: String,
    gas: &mut Gas,
    t: f64,
    p: f64,
    f: F,
) where
    F: Fn(&mut Gas, f64, f64) -> GasResult<f64>,
{
    let mut i = 0usize;
    group.bench_function(name, |b| {
        b.iter(|| {
            i = (i + 1) % 1000;
            f(gas, black_box(t + 1e-3 * i as f64), p).unwrap()
        })
    });
}

fn properties_helmholtz(c: &mut Criterion) {
    let mut group = c.benchmark_group("gas_properties_helmholtz");
    for fluid in [Fluid::Hydrogen, Fluid::Oxygen, Fluid::Methane] {
        let mut gas = Gas::helmholtz(fluid).unwrap();
        let t = 1.5 * fluid.constants().t_crit;
        bench_property(&mut group, format!("{fluid}_rho"), &mut gas, t, 1e6, Gas::rho);
        bench_property(&mut group, format!("{fluid}_cp"), &mut gas, t, 1e6, Gas::cp);
        bench_property(&mut group, format!("{fluid}_c"), &mut gas, t, 1e6, Gas::c);
    }
    let mut oxygen = Gas::helmholtz(Fluid::Oxygen).unwrap();
    bench_property(&mut group, "oxygen_lambda".into(), &mut oxygen, 300.0, 1e6, Gas::lambda);
    group.finish();
}

fn properties_mixture(c: &mut Criterion) {
    let species = ["CH4", "N2", "CO2"];
    let mut group = c.benchmark_group("gas_properties_natural_gas");
    for (name, model) in [
        ("ideal", GasModel::Ideal),
        ("pr", GasModel::Cubic(CubicKind::PengRobinson)),
        ("srk", GasModel::Cubic(CubicKind::SoaveRedlichKwong)),
    ] {
        let mut gas = Gas::new(model, &species, &[0.8, 0.15, 0.05]).unwrap();
        bench_property(&mut group, format!("{name}_rho"), &mut gas, 300.0, 7e6, Gas::rho);
        bench_property(&mut group, format!("{name}_cp"), &mut gas, 300.0, 7e6, Gas::cp);
        bench_property(&mut group, format!("{name}_mu"), &mut gas, 300.0, 7e6, Gas::mu);
    }
    group.finish();
}

criterion_group!(bench, properties_helmholtz, properties_mixture);
criterion_main!(bench);
