mod ast;
mod emit;
mod lexer;
mod parser;

use std::fmt;
use std::fs;
use std::io::{self, Read};
use std::process;

use anyhow::Context;
use clap::{crate_version, App, Arg};

use emit::{AstDumper, CodeEmitter};
use parser::Parser;

fn main() -> anyhow::Result<()> {
    let matches = App::new("prism")
        .version(crate_version!())
        .about("parses prism source and dumps the constructs it finds")
        .arg(
            Arg::with_name("eval")
                .short("e")
                .long("eval")
                .value_name("SOURCE")
                .help("parse SOURCE instead of a file")
                .takes_value(true),
        )
        .arg(Arg::with_name("INPUT").help("source file to parse").index(1))
        .get_matches();

    let source = if let Some(source) = matches.value_of("eval") {
        source.to_string()
    } else if let Some(path) = matches.value_of("INPUT") {
        fs::read_to_string(path).with_context(|| format!("failed to read {}", path))?
    } else {
        let mut buf = String::new();
        io::stdin()
            .read_to_string(&mut buf)
            .context("failed to read stdin")?;
        buf
    };

    let mut emitter = AstDumper;
    let (outputs, errors) = drive(&source, &mut emitter);
    for output in outputs {
        println!("{}", output);
    }
    if errors > 0 {
        process::exit(1);
    }
    Ok(())
}

/// Pulls top-level constructs out of `source` and feeds them to `emitter`.
/// Every failure is reported and the parser resynchronized, so one bad
/// construct doesn't end the session. Returns the emitter outputs and the
/// number of errors reported.
fn drive<E: CodeEmitter>(source: &str, emitter: &mut E) -> (Vec<E::Output>, usize) {
    let mut parser = Parser::new(source);
    let mut outputs = Vec::new();
    let mut errors = 0;
    loop {
        let (line, col) = parser.position();
        match parser.next_item() {
            None => break,
            Some(Ok(item)) => match emitter.emit(item) {
                Ok(output) => outputs.push(output),
                Err(err) => {
                    report(line, col, &err);
                    errors += 1;
                }
            },
            Some(Err(err)) => {
                report(err.line, err.col, &err);
                errors += 1;
                parser.synchronize();
            }
        }
    }
    (outputs, errors)
}

// The one place diagnostics are rendered.
fn report(line: u32, col: u32, message: &dyn fmt::Display) {
    eprintln!("Error (line {}, col {}): {}", line, col, message);
}
