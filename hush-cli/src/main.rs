// Hush
// Copyright (c) 2026 The Hush Project Developers.
//
// This Source Code Form is subject to the terms of the Mozilla Public
// License, v. 2.0. If a copy of the MPL was not distributed with this
// file, You can obtain one at https://mozilla.org/MPL/2.0/.

//! Reference WAV converter: streams a 16 kHz mono 16-bit WAV file through
//! the denoiser and writes the result, passing the 78-byte header through
//! verbatim. Each distinct failure point maps to its own exit code so
//! integration harnesses can tell them apart.

use std::fs::File;
use std::io::{Read, Write};
use std::process;
use std::time::Instant;

use clap::{App, Arg, ArgGroup, ErrorKind};
use log::{error, info};

use hush_core::config::{Config, Mode};
use hush_core::denoise::Denoiser;
use hush_core::errors::Error;

const WAV_HEADER_LEN: usize = 78;

const SAMPLE_RATE: u32 = 16000;
const CHANNELS: u32 = 1;
const BITS_PER_SAMPLE: u32 = 16;

const BUF_LEN: usize = 8192;

fn main() {
    pretty_env_logger::init();

    let matches = App::new("hush-cli")
        .version("0.1")
        .about("Denoise a 16 kHz mono 16-bit WAV file")
        .arg(Arg::new("specsub")
            .long("specsub")
            .help("Berouti-Schwartz spectral subtraction"))
        .arg(Arg::new("wiener")
            .long("wiener")
            .help("Scalart's Wiener filtering"))
        .arg(Arg::new("tsnr")
            .long("tsnr")
            .help("Scalart's two-step noise reduction"))
        .arg(Arg::new("tsnrg")
            .long("tsnrg")
            .help("Scalart's two-step noise reduction with gain shaping"))
        .arg(Arg::new("rtsnr")
            .long("rtsnr")
            .help("Shifeng's two-step noise reduction"))
        .arg(Arg::new("rtsnrg")
            .long("rtsnrg")
            .help("Shifeng's two-step noise reduction with gain shaping"))
        .group(ArgGroup::new("mode")
            .args(&["specsub", "wiener", "tsnr", "tsnrg", "rtsnr", "rtsnrg"])
            .required(true))
        .arg(Arg::new("INPUT")
            .help("The input WAV file path")
            .required(true)
            .index(1))
        .arg(Arg::new("OUTPUT")
            .help("The output WAV file path")
            .required(true)
            .index(2))
        .try_get_matches();

    let matches = match matches {
        Ok(matches) => matches,
        Err(err) => match err.kind() {
            ErrorKind::DisplayHelp | ErrorKind::DisplayVersion => {
                let _ = err.print();
                process::exit(0);
            }
            // An unrecognised flag is a bad mode; anything else is usage.
            ErrorKind::UnknownArgument => {
                let _ = err.print();
                process::exit(2);
            }
            _ => {
                let _ = err.print();
                process::exit(1);
            }
        },
    };

    let mode = if matches.is_present("specsub") {
        Mode::SpecSub
    }
    else if matches.is_present("wiener") {
        Mode::Wiener
    }
    else if matches.is_present("tsnr") {
        Mode::Tsnr
    }
    else if matches.is_present("tsnrg") {
        Mode::TsnrG
    }
    else if matches.is_present("rtsnr") {
        Mode::Rtsnr
    }
    else {
        Mode::RtsnrG
    };

    let input = matches.value_of("INPUT").unwrap();
    let output = matches.value_of("OUTPUT").unwrap();

    process::exit(run(mode, input, output));
}

fn run(mode: Mode, input: &str, output: &str) -> i32 {
    let conf = Config {
        sample_rate: SAMPLE_RATE,
        channels: CHANNELS,
        bits_per_sample: BITS_PER_SAMPLE,
        mode,
        ..Default::default()
    };

    if let Err(Error::InvalidConfig(field)) = conf.validate() {
        error!("invalid configuration in parameter {} ({})", field.index(), field);
        return 3;
    }

    let start = Instant::now();

    let mut denoiser = match Denoiser::new(&conf) {
        Ok(denoiser) => denoiser,
        Err(err) => {
            error!("unable to configure denoiser: {}", err);
            return 5;
        }
    };

    let mut f_in = match File::open(input) {
        Ok(f) => f,
        Err(err) => {
            error!("unable to open input wav file {}: {}", input, err);
            return 6;
        }
    };
    let mut f_out = match File::create(output) {
        Ok(f) => f,
        Err(err) => {
            error!("unable to open output wav file {}: {}", output, err);
            return 7;
        }
    };

    // Header pass-through: the stream proper starts 78 bytes in.
    let mut header = [0u8; WAV_HEADER_LEN];
    if let Err(err) = f_in.read_exact(&mut header) {
        error!("short read on wav header: {}", err);
        return 8;
    }
    if let Err(err) = f_out.write_all(&header) {
        error!("unable to write output wav file: {}", err);
        return 7;
    }

    let mut buf_in = [0u8; BUF_LEN];
    let mut buf_out = [0u8; BUF_LEN];

    loop {
        let data_len = match f_in.read(&mut buf_in) {
            Ok(0) => break,
            Ok(n) => n,
            Err(err) => {
                error!("read error on input wav file: {}", err);
                return 8;
            }
        };

        let processed = match denoiser.push(&buf_in[..data_len]) {
            Ok(n) => n,
            Err(err) => {
                error!("push error ({}): {}", err.code(), err);
                return 8;
            }
        };

        if processed > 0 {
            if let Err(code) = drain(&mut denoiser, &mut f_out, &mut buf_out) {
                return code;
            }
        }
    }

    denoiser.flush();
    if let Err(code) = drain(&mut denoiser, &mut f_out, &mut buf_out) {
        return code;
    }

    info!("processing time elapsed: {:.2} ms", start.elapsed().as_secs_f64() * 1000.0);

    0
}

/// Copy every currently finalised byte to the output file.
fn drain(denoiser: &mut Denoiser, f_out: &mut File, buf: &mut [u8]) -> Result<(), i32> {
    loop {
        let n = denoiser.get(buf);
        if n == 0 {
            return Ok(());
        }

        if let Err(err) = f_out.write_all(&buf[..n]) {
            error!("unable to write output wav file: {}", err);
            return Err(7);
        }
    }
}
