// Copyright 2025 the Orthant Authors
// SPDX-License-Identifier: Apache-2.0 OR MIT

//! Runs the full boundary/index/oracle consistency sweep.

use std::process::ExitCode;

use clap::Parser;
use orthant_harness::{DominanceQuery, Fixture, HarnessConfig, Result, SweepReport};
use tracing::{error, info};
use tracing_subscriber::EnvFilter;

/// Cross-check spatial indexes against a brute-force dominance oracle.
#[derive(Parser, Debug)]
#[command(name = "orthant-check", version)]
struct Args {
    /// Boundary points to generate.
    #[arg(long)]
    boundary_points: Option<usize>,

    /// Random query points to sweep.
    #[arg(long)]
    query_points: Option<usize>,

    /// RNG seed.
    #[arg(long)]
    seed: Option<u64>,

    /// Spread of the random squeeze factor `1 + spread * U[0,1]`.
    #[arg(long)]
    squeeze_spread: Option<f64>,

    /// Give up on a boundary point after this many rejected draws (default: never).
    #[arg(long)]
    max_attempts: Option<u64>,

    /// Boundary point checked against the half-size index.
    #[arg(long)]
    known_point: Option<usize>,

    /// Run in 25 dimensions with the high-dimensional defaults instead of 4.
    #[arg(long)]
    high_dim: bool,

    /// Skip the `rstar` comparison.
    #[arg(long)]
    no_rstar: bool,
}

impl Args {
    fn config(&self) -> HarnessConfig {
        let mut cfg = if self.high_dim {
            HarnessConfig::high_dimensional()
        } else {
            HarnessConfig::default()
        };
        if let Some(n) = self.boundary_points {
            cfg = cfg.with_boundary_points(n);
        }
        if let Some(n) = self.query_points {
            cfg = cfg.with_query_points(n);
        }
        if let Some(seed) = self.seed {
            cfg = cfg.with_seed(seed);
        }
        if let Some(spread) = self.squeeze_spread {
            cfg = cfg.with_squeeze_spread(spread);
        }
        if let Some(k) = self.known_point {
            cfg = cfg.with_known_point(k);
        }
        cfg.with_max_attempts(self.max_attempts)
    }
}

#[cfg(feature = "compare_rstar")]
fn rstar_indexes(fixture: &Fixture<4>) -> Vec<Box<dyn DominanceQuery<4>>> {
    fixture.rstar_indexes()
}

#[cfg(not(feature = "compare_rstar"))]
fn rstar_indexes(_: &Fixture<4>) -> Vec<Box<dyn DominanceQuery<4>>> {
    Vec::new()
}

fn run_4d(config: HarnessConfig, with_rstar: bool) -> Result<Vec<SweepReport>> {
    let fixture = Fixture::<4>::build(config)?;
    let mut indexes = fixture.native_indexes();
    if with_rstar {
        indexes.extend(rstar_indexes(&fixture));
    }
    fixture.check(&indexes)
}

// rstar is only wired up for the 4D run.
fn run_25d(config: HarnessConfig) -> Result<Vec<SweepReport>> {
    let fixture = Fixture::<25>::build(config)?;
    fixture.check(&fixture.native_indexes())
}

fn main() -> ExitCode {
    let filter = EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new("info"));
    tracing_subscriber::fmt().with_env_filter(filter).init();

    let args = Args::parse();
    let config = args.config();
    info!(?config, high_dim = args.high_dim, "starting consistency run");

    let outcome = if args.high_dim {
        run_25d(config)
    } else {
        run_4d(config, !args.no_rstar)
    };

    match outcome {
        Ok(reports) => {
            for r in &reports {
                println!(
                    "{:<20} prefix={:<6} below_count={} above_count={}",
                    r.index_name, r.prefix, r.below, r.above
                );
            }
            info!(indexes = reports.len(), "all indexes agree with point_above");
            ExitCode::SUCCESS
        }
        Err(err) => {
            error!(%err, "consistency run failed");
            ExitCode::FAILURE
        }
    }
}
