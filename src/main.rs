//! Thin command-line front-end: replay one proof, optionally minimise it, and exit with the
//! reference driver's exit-code contract.
use std::{fs, path::PathBuf, process::ExitCode};

use anyhow::{bail, Context};
use clap::{Parser, Subcommand};
use pbcheck::{Checker, CheckerOptions};

#[derive(Parser, Debug)]
#[command(name = "pbcheck", about = "Pseudo-Boolean cutting-planes proof checker")]
struct Cli {
    #[command(subcommand)]
    action: Action,

    /// Treat a `c` step citing a non-falsified constraint as a fatal error.
    #[arg(long, global = true)]
    strict_contradiction_checks: bool,
}

#[derive(Subcommand, Debug)]
enum Action {
    /// Replay a proof and report whether it reaches a contradiction.
    Check {
        opb_path: PathBuf,
        proof_path: PathBuf,
    },
    /// Replay a proof, then write a minimised proof plus its antecedent side-band.
    Minimise {
        opb_path: PathBuf,
        proof_path: PathBuf,
        out_path: PathBuf,
        /// Where to write the antecedent side-band. Defaults to `out_path` with a `.rup`
        /// extension.
        #[arg(long)]
        antecedent_sideband_path: Option<PathBuf>,
    },
}

fn main() -> ExitCode {
    env_logger::init();
    let cli = Cli::parse();

    let options = CheckerOptions {
        strict_contradiction_checks: cli.strict_contradiction_checks,
        ..CheckerOptions::default()
    };

    match run(cli.action, options) {
        Ok(()) => ExitCode::SUCCESS,
        Err(err) => {
            log::error!("{err:#}");
            ExitCode::FAILURE
        }
    }
}

fn run(action: Action, options: CheckerOptions) -> anyhow::Result<()> {
    match action {
        Action::Check { opb_path, proof_path } => {
            let report = replay(&opb_path, &proof_path, options)?;
            match report.contradiction_step {
                Some(step) => {
                    log::info!("proof admitted, contradiction at step {step}");
                    Ok(())
                }
                None => bail!("proof replayed without reaching a contradiction"),
            }
        }
        Action::Minimise {
            opb_path,
            proof_path,
            out_path,
            antecedent_sideband_path,
        } => {
            let sideband_path = antecedent_sideband_path
                .or_else(|| options.antecedent_sideband_path.clone())
                .unwrap_or_else(|| out_path.with_extension("rup"));
            let report = replay(&opb_path, &proof_path, options)?;
            let minimised = report
                .minimise()
                .context("proof replayed without reaching a contradiction")?;
            fs::write(&out_path, &minimised.text)
                .with_context(|| format!("writing minimised proof to {}", out_path.display()))?;
            let file = fs::File::create(&sideband_path)
                .with_context(|| format!("creating antecedent side-band {}", sideband_path.display()))?;
            report
                .antecedents()
                .write_sideband(file)
                .context("writing antecedent side-band")?;
            log::info!(
                "kept {} of {} proof steps ({:.2}%)",
                minimised.kept,
                minimised.original,
                if minimised.original == 0 {
                    0.0
                } else {
                    100.0 * minimised.kept as f64 / minimised.original as f64
                }
            );
            Ok(())
        }
    }
}

fn replay(
    opb_path: &PathBuf,
    proof_path: &PathBuf,
    options: CheckerOptions,
) -> anyhow::Result<pbcheck::CheckReport> {
    let opb_text = fs::read_to_string(opb_path)
        .with_context(|| format!("reading OPB model {}", opb_path.display()))?;
    let proof_text = fs::read_to_string(proof_path)
        .with_context(|| format!("reading proof {}", proof_path.display()))?;

    let mut checker = Checker::new(options);
    checker
        .load_model(&opb_text)
        .with_context(|| format!("parsing OPB model {}", opb_path.display()))?;
    checker
        .check_proof(&proof_text)
        .with_context(|| format!("replaying proof {}", proof_path.display()))
}
