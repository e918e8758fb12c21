//! freqkit driver: stream heavy-hitter counting over stdin.
//!
//! Reads one record per line. Plain modes treat the whole line as the
//! key; sum modes pull a token and a pre-aggregated frequency out of
//! tab-separated fields. Results go to stdout as tab-separated lines,
//! optionally filtered by a support threshold.

use std::io::{self, BufRead, BufWriter, Write};
use std::process::ExitCode;

use freqkit::count::CountType;
use freqkit::counter::{ExactCounter, StreamSummary};
use freqkit::record::{RecordLayout, SumAggregator};
use freqkit::traits::Counter;

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
enum Algorithm {
    Exact,
    SpaceSaving,
    Sum,
    SumSpaceSaving,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
enum CountWidth {
    U16,
    U32,
    U64,
}

#[derive(Debug)]
struct Options {
    algorithm: Algorithm,
    width: CountWidth,
    capacity: usize,
    token_field: usize,
    freq_field: usize,
    support: Option<f64>,
    absolute_support: Option<u64>,
    help: bool,
}

impl Default for Options {
    fn default() -> Self {
        Self {
            algorithm: Algorithm::Exact,
            width: CountWidth::U32,
            capacity: 1024,
            token_field: 1,
            freq_field: 2,
            support: None,
            absolute_support: None,
            help: false,
        }
    }
}

/// Support cutoff resolved against a counter's total.
#[derive(Debug, Clone, Copy)]
enum Threshold {
    None,
    Absolute(u64),
    Relative(f64),
}

impl Threshold {
    fn resolve(opts: &Options) -> Self {
        if let Some(abs) = opts.absolute_support {
            Threshold::Absolute(abs)
        } else if let Some(rel) = opts.support {
            Threshold::Relative(rel)
        } else {
            Threshold::None
        }
    }

    fn passes<C: CountType>(self, count: C, total: C) -> bool {
        match self {
            Threshold::None => true,
            Threshold::Absolute(abs) => count.as_u64() >= abs,
            Threshold::Relative(rel) => count.as_u64() as f64 >= rel * total.as_u64() as f64,
        }
    }
}

fn parse_args(args: &[String]) -> Result<Options, String> {
    let mut opts = Options::default();

    let mut i = 1;
    while i < args.len() {
        let flag = args[i].as_str();
        match flag {
            "-a" | "--algorithm" => {
                let value = flag_value(args, &mut i)?;
                opts.algorithm = match value.as_str() {
                    "exact" => Algorithm::Exact,
                    "spacesaving" => Algorithm::SpaceSaving,
                    "sum" => Algorithm::Sum,
                    "sum_spacesaving" => Algorithm::SumSpaceSaving,
                    other => return Err(format!("unrecognized algorithm: {other}")),
                };
            },
            "-c" | "--type" => {
                let value = flag_value(args, &mut i)?;
                opts.width = match value.as_str() {
                    "uint16" => CountWidth::U16,
                    "uint32" => CountWidth::U32,
                    "uint64" => CountWidth::U64,
                    other => return Err(format!("unrecognized count type: {other}")),
                };
            },
            "-e" | "--epsilon" => {
                opts.capacity = numeric_value(args, &mut i)?;
            },
            "-t" | "--token-field" => {
                opts.token_field = numeric_value(args, &mut i)?;
            },
            "-f" | "--freq-field" => {
                opts.freq_field = numeric_value(args, &mut i)?;
            },
            "-s" | "--support" => {
                let value: f64 = numeric_value(args, &mut i)?;
                if !(0.0..=1.0).contains(&value) {
                    return Err(format!("support must be in [0,1]; got {value}"));
                }
                opts.support = Some(value);
            },
            "-S" | "--absolute-support" => {
                opts.absolute_support = Some(numeric_value(args, &mut i)?);
            },
            "-h" | "--help" => {
                opts.help = true;
            },
            other => return Err(format!("unrecognized option: {other}")),
        }
        i += 1;
    }

    Ok(opts)
}

fn flag_value(args: &[String], i: &mut usize) -> Result<String, String> {
    let flag = args[*i].clone();
    *i += 1;
    args.get(*i)
        .cloned()
        .ok_or_else(|| format!("option {flag} requires a value"))
}

fn numeric_value<T: std::str::FromStr>(args: &[String], i: &mut usize) -> Result<T, String> {
    let flag = args[*i].clone();
    let value = flag_value(args, i)?;
    value
        .parse()
        .map_err(|_| format!("invalid value for {flag}: {value}"))
}

fn print_help() {
    println!(
        "Usage: freqkit [OPTIONS] < input\n\
         \n\
         Counts key frequencies over stdin, one record per line.\n\
         \n\
         Options:\n\
         \x20 -a, --algorithm X        exact | spacesaving | sum | sum_spacesaving\n\
         \x20                          (default: exact)\n\
         \x20 -c, --type T             count width: uint16 | uint32 | uint64\n\
         \x20                          (default: uint32)\n\
         \x20 -e, --epsilon N          number of Space-Saving counters (default: 1024)\n\
         \x20 -t, --token-field K      1-based token field for sum modes (default: 1)\n\
         \x20 -f, --freq-field K       1-based frequency field for sum modes (default: 2)\n\
         \x20 -s, --support X          relative support threshold in [0,1]\n\
         \x20 -S, --absolute-support N absolute support threshold\n\
         \x20 -h, --help               print this help and exit\n\
         \n\
         Plain modes use the whole line as the key and print\n\
         `key<TAB>count` (exact) or `key<TAB>count<TAB>epsilon`\n\
         (spacesaving). Sum modes read tab-separated records that already\n\
         carry partial counts."
    );
}

fn run<C: CountType>(opts: &Options) -> Result<(), Box<dyn std::error::Error>> {
    let stdin = io::stdin();
    let input = stdin.lock();
    let stdout = io::stdout();
    let mut out = BufWriter::new(stdout.lock());

    match opts.algorithm {
        Algorithm::Exact => {
            let mut counter = ExactCounter::<String, C>::new();
            for line in input.lines() {
                counter.append(line?);
            }
            write_exact(&mut out, &counter, Threshold::resolve(opts))?;
        },
        Algorithm::SpaceSaving => {
            let mut summary = StreamSummary::<String, C>::new(opts.capacity)?;
            for line in input.lines() {
                summary.append(line?);
            }
            write_summary(&mut out, &summary, Threshold::resolve(opts))?;
        },
        Algorithm::Sum => {
            let layout = RecordLayout::new(opts.token_field, opts.freq_field)?;
            let mut agg = SumAggregator::new(layout, ExactCounter::<String, C>::new());
            for line in input.lines() {
                agg.consume(&line?);
            }
            write_exact(&mut out, agg.counter(), Threshold::resolve(opts))?;
        },
        Algorithm::SumSpaceSaving => {
            let layout = RecordLayout::new(opts.token_field, opts.freq_field)?;
            let summary = StreamSummary::<String, C>::new(opts.capacity)?;
            let mut agg = SumAggregator::new(layout, summary);
            for line in input.lines() {
                agg.consume(&line?);
            }
            write_summary(&mut out, agg.counter(), Threshold::resolve(opts))?;
        },
    }

    out.flush()?;
    Ok(())
}

fn write_exact<C: CountType>(
    out: &mut impl Write,
    counter: &ExactCounter<String, C>,
    threshold: Threshold,
) -> io::Result<()> {
    let total = counter.total();
    for (key, count) in counter.iter() {
        if threshold.passes(count, total) {
            writeln!(out, "{key}\t{count}")?;
        }
    }
    Ok(())
}

fn write_summary<C: CountType>(
    out: &mut impl Write,
    summary: &StreamSummary<String, C>,
    threshold: Threshold,
) -> io::Result<()> {
    let total = summary.total();
    for (key, count, eps) in summary.iter() {
        if threshold.passes(count, total) {
            writeln!(out, "{key}\t{count}\t{eps}")?;
        }
    }
    Ok(())
}

fn main() -> ExitCode {
    let args: Vec<String> = std::env::args().collect();
    let opts = match parse_args(&args) {
        Ok(opts) => opts,
        Err(message) => {
            eprintln!("ERROR: {message}");
            return ExitCode::from(1);
        },
    };

    if opts.help {
        print_help();
        return ExitCode::SUCCESS;
    }

    let result = match opts.width {
        CountWidth::U16 => run::<u16>(&opts),
        CountWidth::U32 => run::<u32>(&opts),
        CountWidth::U64 => run::<u64>(&opts),
    };

    match result {
        Ok(()) => ExitCode::SUCCESS,
        Err(error) => {
            eprintln!("ERROR: {error}");
            ExitCode::from(1)
        },
    }
}
