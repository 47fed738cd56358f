use std::path::PathBuf;
use anyhow::Context;
use clap::Parser;
use indicatif::{ ProgressBar, ProgressStyle };
use lib::output::{ PREC, Recorder, WIDTH, sci };
use xspace2d::{ params::RunParams, timedep::Method, utils::total_probability };

/// Evolve a Gaussian wave packet in a box, optionally through a slit wall,
/// and record its probability density over time.
#[derive(Parser, Debug)]
struct Args {
    /// Parameter file: eleven values, one per line; `#` starts a comment line.
    #[arg(default_value = "parameters.txt")]
    params: PathBuf,

    /// Directory to write output files to.
    #[arg(short, long, default_value = "data")]
    outdir: PathBuf,
}

fn main() -> anyhow::Result<()> {
    env_logger::builder()
        .format_timestamp_secs()
        .filter_level(log::LevelFilter::Info)
        .parse_default_env()
        .init();
    let args = Args::parse();

    let params
        = RunParams::read(&args.params)
        .with_context(|| format!("loading parameters from {:?}", args.params))?;
    log::info!("{params:?}");
    let nt = params.nt();
    let sys = params.system().context("setting up the grid")?;
    let grid = *sys.get_grid();
    let prop
        = sys.propagator(params.dt, Method::default())
        .context("preparing the Crank-Nicolson operators")?;
    let q0
        = sys.initial_state(&params.packet)
        .context("building the initial wave packet")?;

    println!(
        "Total initial probability is {}",
        sci(total_probability(&q0, grid.h()), WIDTH, PREC),
    );

    let mut recorder
        = Recorder::new(&args.outdir, grid, params.selector, params.dt, nt)?;
    recorder.record(&q0)?;

    let bar = ProgressBar::new(nt as u64);
    bar.set_style(
        ProgressStyle::with_template("{elapsed_precise} [{bar:40}] {pos}/{len} ({eta})")
            .context("progress bar template")?
            .progress_chars("█ "),
    );
    let mut q = q0;
    let mut failure = None;
    for step in 1..=nt {
        match prop.advance(&q, step) {
            Ok(next) => {
                q = next;
                recorder.record(&q)?;
                bar.inc(1);
            },
            Err(err) => {
                failure = Some(err);
                break;
            },
        }
    }
    if failure.is_some() { bar.abandon(); } else { bar.finish(); }

    let paths = recorder.finish()?;
    if let Some(err) = failure {
        return Err(err).context("time evolution aborted; completed steps were saved");
    }
    log::info!("wrote {paths:?}");
    println!("\nAll good!");
    Ok(())
}
