use criterion::{Criterion, black_box, criterion_group, criterion_main};
use testglob_config::{ConfigFormat, TestConfig};
use testglob_pattern::{Dashes, PatternSet, compile};

pub fn compile_single(c: &mut Criterion) {
    c.bench_function("compile class pattern", |b| {
        b.iter(|| black_box(compile(black_box("Test-[!a-z]*Case?"), Dashes::WordBoundary)));
    });
}

pub fn compile_100_patterns(c: &mut Criterion) {
    let patterns = (0..100)
        .map(|i| format!("check{i}_* [!_]verify{i}?"))
        .collect::<Vec<_>>()
        .join(" ");
    c.bench_function("compile 100 pattern set", |b| {
        b.iter(|| black_box(PatternSet::new(&patterns, Dashes::Literal)).unwrap());
    });
}

pub fn load_pyproject(c: &mut Criterion) {
    let mut source = String::from("[project]\nname = \"demo\"\n");
    for i in 0..200 {
        source.push_str(&format!("[tool.other{i}]\nkey = \"value\"\n"));
    }
    source.push_str("[tool.pytest.ini_options]\npython_functions = [\"test_*\", \"check_*\"]\n");
    c.bench_function("load pyproject and match", |b| {
        b.iter(|| {
            let config = TestConfig::parse(ConfigFormat::Toml, &source).unwrap();
            black_box(config.is_function("check_thing"))
        });
    });
}

criterion_group!(bench_compile, compile_single, compile_100_patterns, load_pyproject);
criterion_main!(bench_compile);
