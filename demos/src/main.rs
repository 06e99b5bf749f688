// SPDX-License-Identifier: Apache-2.0

use std::env;
use std::fs::File;
use std::io::Read;

use flatjson::{FieldValue, PushParser};
use log::info;

fn main() {
    env_logger::init();

    let args: Vec<_> = env::args().collect();
    if args.len() != 2 {
        println!("Usage: {} file.json", args[0]);
        std::process::exit(1);
    }
    let path = &args[1];
    let mut s = String::new();
    let mut f = match File::open(path) {
        Ok(file) => file,
        Err(e) => {
            eprintln!("Error: Unable to open file '{}': {}", path, e);
            std::process::exit(1);
        }
    };

    if let Err(e) = f.read_to_string(&mut s) {
        eprintln!("Error: Unable to read file '{}': {}", path, e);
        std::process::exit(1);
    }

    // The parser wants one character at a time; any transport works.
    let mut parser = PushParser::new();
    for c in s.chars() {
        parser.feed(c);
    }
    parser.finish();
    info!("parsed {} fields from '{}'", parser.field_count(), path);

    println!("{} fields:", parser.field_count());
    for index in 0..parser.field_count() {
        let field = match parser.store().field(index) {
            Ok(field) => field,
            Err(e) => {
                eprintln!("Error: {}", e);
                std::process::exit(1);
            }
        };
        match field.value() {
            FieldValue::Number(n) => println!("  {} = {}", field.name(), n),
            FieldValue::String(s) => println!("  {} = {:?}", field.name(), s),
            FieldValue::NumberArray(items) => {
                println!("  {} = {:?} ({} elements)", field.name(), items, field.array_len())
            }
            FieldValue::StringArray(items) => {
                println!("  {} = {:?} ({} elements)", field.name(), items, field.array_len())
            }
        }
    }
    if parser.fields_dropped() > 0 {
        eprintln!("Warning: {} fields dropped (store full)", parser.fields_dropped());
    }
}
