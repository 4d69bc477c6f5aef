use criterion::{black_box, criterion_group, criterion_main, Criterion};
use tydex_parser::{Lexer, Parser};

const MODULE_SOURCE: &str = r#"
import { EventEmitter } from "events";
import type { Config } from "./config";

export interface Handler<T> {
    handle(event: T): Promise<void>;
    readonly name: string;
}

export type HandlerMap = Record<string, Handler<unknown>>;

export class Dispatcher extends EventEmitter {
    private handlers: HandlerMap = {};
    static create(config: Config): Dispatcher { return new Dispatcher(); }
    register<T>(name: string, handler: Handler<T>): void {
        this.handlers[name] = handler as Handler<unknown>;
    }
    dispatch(name: string, payload: unknown): Promise<void> {
        const handler = this.handlers[name];
        return handler ? handler.handle(payload) : Promise.resolve();
    }
}

export const DEFAULT_TIMEOUT = 30000;
export function createDispatcher(config: Config): Dispatcher {
    return Dispatcher.create(config);
}
"#;

fn bench_lexer(c: &mut Criterion) {
    c.bench_function("lex_module", |b| {
        b.iter(|| {
            let lexer = Lexer::new(black_box(MODULE_SOURCE));
            lexer.tokenize()
        })
    });
}

fn bench_parser(c: &mut Criterion) {
    c.bench_function("parse_module", |b| {
        b.iter(|| {
            let parser = Parser::new(black_box(MODULE_SOURCE));
            parser.parse()
        })
    });

    let large: String = MODULE_SOURCE.repeat(50);
    c.bench_function("parse_module_large", |b| {
        b.iter(|| {
            let parser = Parser::new(black_box(&large));
            parser.parse()
        })
    });
}

criterion_group!(benches, bench_lexer, bench_parser);
criterion_main!(benches);
