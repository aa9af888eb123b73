//! Parse and generate benchmarks.

use criterion::{black_box, criterion_group, criterion_main, Criterion, Throughput};
use deuglify_parser::{generate, parse, Lexer, ScopeTree, TokenKind};

const SAMPLE_SOURCE: &str = r#"
!function(e,t){"use strict";var n=[],r=Object.getPrototypeOf,i=n.slice,o=n.concat;
function a(e,t,n){var r,i,o=(n=n||document).createElement("script");if(o.text=e,t)for(r in t)(i=t[r]||t.getAttribute&&t.getAttribute(r))&&o.setAttribute(r,i);n.head.appendChild(o).parentNode.removeChild(o)}
function s(e){return null==e?e+"":"object"==typeof e||"function"==typeof e?n[i.call(e)]||"object":typeof e}
for(var u=0,l=e.length;u<l;u++)if(!1===t.call(e[u],u,e[u]))break;
var c=function(e){return e&&e.nodeType?(a(e),!0):(s(e),!1)};
class f extends c{constructor(e){super(e),this.x=e}get y(){return this.x*2}static{f.z=!0}}
t.ready=async e=>{await e,c(e)||f(e)};return`${e}-${t}`}(window,[]);
"#;

fn bench_lexer(c: &mut Criterion) {
    let mut group = c.benchmark_group("lexer");
    group.throughput(Throughput::Bytes(SAMPLE_SOURCE.len() as u64));

    group.bench_function("sample", |b| {
        b.iter(|| {
            let mut lexer = Lexer::new(black_box(SAMPLE_SOURCE));
            loop {
                let token = lexer.next_token();
                if matches!(token.kind, TokenKind::Eof) {
                    break;
                }
            }
        });
    });

    group.finish();
}

fn bench_parse_generate(c: &mut Criterion) {
    let mut group = c.benchmark_group("parser");
    group.throughput(Throughput::Bytes(SAMPLE_SOURCE.len() as u64));

    group.bench_function("parse", |b| {
        b.iter(|| parse(black_box(SAMPLE_SOURCE)))
    });

    let ast = match parse(SAMPLE_SOURCE) {
        Ok(ast) => ast,
        Err(e) => panic!("sample failed to parse: {e}"),
    };
    group.bench_function("generate", |b| b.iter(|| generate(black_box(&ast))));
    group.bench_function("scopes", |b| b.iter(|| ScopeTree::build(black_box(&ast))));

    group.finish();
}

criterion_group!(benches, bench_lexer, bench_parse_generate);
criterion_main!(benches);
