use criterion::{black_box, criterion_group, criterion_main, BenchmarkId, Criterion, Throughput};

use utf8lex_core::buffer::{BufferChain, BufferCursor};
use utf8lex_core::category::{LETTER, NUM_DECIMAL, WHITESPACE};
use utf8lex_core::db::{Database, DefinitionBody};
use utf8lex_core::driver::Driver;
use utf8lex_core::error::Outcome;
use utf8lex_core::unit::Locations;

fn word_like_db() -> Database {
    let mut db = Database::new();
    let ident = db.define("IDENT", DefinitionBody::Category(LETTER)).unwrap();
    let number = db.define("NUMBER", DefinitionBody::Category(NUM_DECIMAL)).unwrap();
    let space = db.define("SPACE", DefinitionBody::Category(WHITESPACE)).unwrap();
    db.add_rule("IDENT", ident);
    db.add_rule("NUMBER", number);
    db.add_rule("SPACE", space);
    db
}

fn lex_all(db: &Database, source: &str) {
    let driver = Driver::new(db);
    let chain = BufferChain::from_complete(source.as_bytes().to_vec());
    let mut position = Locations::new();
    let mut cursor = BufferCursor::START;
    loop {
        match driver.next_token(&chain, &mut position, &mut cursor).unwrap() {
            Outcome::Matched(token) => {
                black_box(token);
            }
            Outcome::Eof => break,
            other => panic!("unexpected outcome in benchmark corpus: {other:?}"),
        }
    }
}

fn bench_throughput(c: &mut Criterion) {
    let db = word_like_db();
    let mut group = c.benchmark_group("lex_words_and_numbers");

    for word_count in [100usize, 1_000, 10_000] {
        let source: String = (0..word_count).map(|i| format!("word{i} ")).collect();
        group.throughput(Throughput::Bytes(source.len() as u64));
        group.bench_with_input(BenchmarkId::from_parameter(word_count), &source, |b, source| {
            b.iter(|| lex_all(&db, source));
        });
    }

    group.finish();
}

criterion_group!(benches, bench_throughput);
criterion_main!(benches);
