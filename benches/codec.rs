use criterion::{black_box, criterion_group, criterion_main, Criterion};

use smile_codec::{decode, encode, Options, OrderedMap, Value};

fn sample_value() -> Value {
    let mut address = OrderedMap::new();
    address.insert("street".to_string(), Value::Str("500 Pine St".to_string()));
    address.insert("city".to_string(), Value::Str("Seattle".to_string()));
    address.insert("zip".to_string(), Value::Str("98101".to_string()));

    let mut person = OrderedMap::new();
    person.insert("name".to_string(), Value::Str("Ada Lovelace".to_string()));
    person.insert("age".to_string(), Value::Int(36));
    person.insert("active".to_string(), Value::Bool(true));
    person.insert("address".to_string(), Value::Object(address));
    person.insert(
        "tags".to_string(),
        Value::Array(vec![
            Value::Str("engineer".to_string()),
            Value::Str("writer".to_string()),
        ]),
    );

    Value::Array(std::iter::repeat(person).take(50).map(Value::Object).collect())
}

fn bench_encode(c: &mut Criterion) {
    let value = sample_value();
    let options = Options::default();
    c.bench_function("encode", |b| {
        b.iter(|| encode(black_box(&value), black_box(&options)).unwrap())
    });
}

fn bench_decode(c: &mut Criterion) {
    let value = sample_value();
    let bytes = encode(&value, &Options::default()).unwrap();
    c.bench_function("decode", |b| b.iter(|| decode(black_box(&bytes)).unwrap()));
}

criterion_group!(benches, bench_encode, bench_decode);
criterion_main!(benches);
