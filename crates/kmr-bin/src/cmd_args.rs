/*
 * Copyright (c) 2026.
 *
 * This software is free software; You can redistribute it or modify it under terms of the MIT, Apache License or Zlib license
 */

use std::path::PathBuf;

use clap::{value_parser, Arg, ArgAction, Command};

pub fn create_cmd_args() -> Command {
    Command::new("kmr")
        .about("Encode and decode kmr images")
        .version(env!("CARGO_PKG_VERSION"))
        .subcommand_required(true)
        .arg_required_else_help(true)
        .args(add_logging_options())
        .subcommand(
            Command::new("encode")
                .about("Encode a PNG image into a kmr container")
                .arg(
                    Arg::new("in")
                        .help("Input PNG file to read pixels from")
                        .value_parser(value_parser!(PathBuf))
                        .required(true)
                )
                .arg(
                    Arg::new("out")
                        .help("Output file, defaults to the input with a .kmr extension")
                        .value_parser(value_parser!(PathBuf))
                )
                .arg(
                    Arg::new("block-size")
                        .long("block-size")
                        .short('b')
                        .help("Side length of a nodal tile in pixels [2-255]")
                        .default_value("8")
                        .value_parser(value_parser!(u8))
                )
                .arg(
                    Arg::new("discard-bits")
                        .long("discard-bits")
                        .short('d')
                        .help("Low bits dropped from every nodal value [0-6], 0 is lossless")
                        .default_value("0")
                        .value_parser(value_parser!(u8))
                )
                .arg(
                    Arg::new("flat")
                        .long("flat")
                        .help("Fill preview tiles with flat node colors instead of interpolating")
                        .action(ArgAction::SetTrue)
                )
        )
        .subcommand(
            Command::new("decode")
                .about("Decode a kmr container into a PNG image")
                .arg(
                    Arg::new("in")
                        .help("Input kmr file")
                        .value_parser(value_parser!(PathBuf))
                        .required(true)
                )
                .arg(
                    Arg::new("out")
                        .help("Output file, defaults to the input with a .png extension")
                        .value_parser(value_parser!(PathBuf))
                )
        )
}

fn add_logging_options() -> [Arg; 4] {
    [
        Arg::new("debug")
            .long("debug")
            .action(ArgAction::SetTrue)
            .global(true)
            .help_heading("Logging")
            .help("Display debug information and higher"),
        Arg::new("trace")
            .long("trace")
            .action(ArgAction::SetTrue)
            .global(true)
            .help_heading("Logging")
            .help("Display very verbose information"),
        Arg::new("warn")
            .long("warn")
            .action(ArgAction::SetTrue)
            .global(true)
            .help_heading("Logging")
            .help("Display warnings and errors only"),
        Arg::new("info")
            .long("info")
            .action(ArgAction::SetTrue)
            .global(true)
            .help_heading("Logging")
            .help("Display informational messages and higher")
    ]
}
