extern crate clap;
extern crate env_logger;
#[macro_use]
extern crate log;
extern crate fzrank;
extern crate shlex;

use std::env;
use std::io::{self, BufWriter, Read, Write};

use clap::Parser;
use color_eyre::eyre::Result;
use fzrank::highlight;
use fzrank::options::FzrOptions;
use fzrank::prelude::*;

//------------------------------------------------------------------------------
fn main() {
    env_logger::builder().format_timestamp_nanos().init();

    match real_main() {
        Ok(exit_code) => std::process::exit(exit_code),
        Err(err) => {
            // if downstream pipe is closed, exit silently
            if let Some(io_err) = err.downcast_ref::<io::Error>()
                && io_err.kind() == io::ErrorKind::BrokenPipe
            {
                std::process::exit(0)
            }
            eprintln!("{:?}", err);
            std::process::exit(2)
        }
    }
}

fn parse_args() -> FzrOptions {
    let mut args = Vec::new();

    args.extend(env::args().next());
    args.extend(
        env::var("FZR_DEFAULT_OPTIONS")
            .ok()
            .and_then(|val| shlex::split(&val))
            .unwrap_or_default(),
    );
    args.extend(env::args().skip(1));

    FzrOptions::parse_from(args)
}

fn read_candidates(read0: bool) -> Result<Vec<String>> {
    let mut buf = Vec::new();
    io::stdin().lock().read_to_end(&mut buf)?;
    let input = String::from_utf8_lossy(&buf);

    let candidates: Vec<String> = if read0 {
        input.split('\0').filter(|s| !s.is_empty()).map(String::from).collect()
    } else {
        input.lines().filter(|s| !s.is_empty()).map(String::from).collect()
    };
    Ok(candidates)
}

fn real_main() -> Result<i32> {
    color_eyre::install()?;
    let opts = parse_args();

    let candidates = read_candidates(opts.read0)?;
    debug!("read {} candidates, query: {:?}", candidates.len(), opts.query);

    let output_ending = if opts.print0 { "\0" } else { "\n" };
    let stdout = io::stdout();
    let mut out = BufWriter::new(stdout.lock());

    // an empty query keeps everything, in input order
    let Some(prepared) = fzrank::prepare_query(&opts.query, &opts.scoring) else {
        let max = opts.max_results.unwrap_or(usize::MAX);
        for candidate in candidates.iter().take(max) {
            write!(out, "{}{}", candidate, output_ending)?;
        }
        out.flush()?;
        return Ok(if candidates.is_empty() { 1 } else { 0 });
    };

    let mut cache = QueryCache::new();
    let results = fzrank::filter_with_cache(
        candidates.iter().map(String::as_str),
        &opts.query,
        &opts.filter_options(),
        &mut cache,
    );
    debug!("{} matches", results.len());

    let wrap_options = opts.wrap_options();
    for Scored { item, score } in &results {
        if opts.print_score {
            write!(out, "{}\t", score)?;
        }
        if opts.highlight {
            write!(out, "{}", highlight::wrap_prepared(item, &prepared, &wrap_options))?;
        } else {
            write!(out, "{}", item)?;
        }
        write!(out, "{}", output_ending)?;
    }

    out.flush()?;

    Ok(if results.is_empty() { 1 } else { 0 })
}
