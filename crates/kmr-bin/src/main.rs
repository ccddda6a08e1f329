/*
 * Copyright (c) 2026.
 *
 * This software is free software; You can redistribute it or modify it under terms of the MIT, Apache License or Zlib license
 */

use std::process::exit;

use clap::ArgMatches;
use log::{error, Level};

mod cmd_args;
mod commands;

fn main() {
    let cmd = cmd_args::create_cmd_args();
    let options = cmd.get_matches();

    setup_logger(&options);

    let result = match options.subcommand() {
        Some(("encode", args)) => commands::encode(args),
        Some(("decode", args)) => commands::decode(args),
        // clap enforces a subcommand
        _ => unreachable!()
    };

    if let Err(reason) = result {
        println!();
        error!("Could not complete the command, reason: {reason}");

        println!();
        exit(-1);
    }
}

fn setup_logger(options: &ArgMatches) {
    let mut log_level = Level::Info;

    if options.get_flag("warn") {
        log_level = Level::Warn;
    }
    if options.get_flag("debug") {
        log_level = Level::Debug;
    }
    if options.get_flag("trace") {
        log_level = Level::Trace;
    }
    if options.get_flag("info") {
        log_level = Level::Info;
    }

    simple_logger::init_with_level(log_level).unwrap();
}
