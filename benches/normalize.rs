use criterion::{criterion_group, criterion_main, Criterion};

use urlsift::{normalize_url, NormalizeOptions};

fn bench_normalize(c: &mut Criterion) {
    let mut group = c.benchmark_group("normalize");
    let inputs = [
        ("bare", "example.com"),
        ("query", "http://www.example.com/?utm_source=x&z=2&a=1&b=3#frag"),
        ("path", "HTTPS://Example.COM//a///b/%7Euser/index.html"),
        ("ipv6", "http://[2001:db8::1]:8080/x/"),
    ];
    let opts = NormalizeOptions::default();
    for (name, input) in inputs {
        group.bench_function(name, |b| b.iter(|| normalize_url(input, &opts)));
    }
    group.finish();
}

criterion_group!(benches, bench_normalize);
criterion_main!(benches);
