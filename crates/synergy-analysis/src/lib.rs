// Copyright 2025 Neuraville Inc.
// SPDX-License-Identifier: Apache-2.0

/*!
# synergy-analysis

Partial information decomposition of postsynaptic spike counts with respect
to an excitatory and two inhibitory presynaptic populations, compared
against shuffled surrogates.

```text
SpikingDataset ──► pid_analysis ──► trials_results ──► aggregate ──► final_results
      │                                    │                              │
 shuffle_data ──► pid_analysis ──► trials_surrogate_<seed>                │
                                           │                              │
                            compare_with_surrogates ──► p_values          │
                                                            └──► plot_pid ◄┘
```

Enable the `parallel` feature to decompose cells on the rayon pool.
*/

/// Crate version from Cargo.toml
pub const VERSION: &str = env!("CARGO_PKG_VERSION");

pub mod aggregate;
pub mod context;
pub mod decomposition;
pub mod error;
pub mod figures;
pub mod pipeline;
pub mod runner;
pub mod significance;
pub mod storage;
pub mod terms;

pub use aggregate::{aggregate, aggregate_surrogates, PidSummary};
pub use context::AnalysisContext;
pub use decomposition::{cell_terms, pid_3d, pid_4d, pid_analysis, PidSettings};
pub use error::{AnalysisError, AnalysisResult};
pub use figures::{plot_pid, FigureSpec, Series, SeriesPoint};
pub use pipeline::{generate_pid_results, surrogate_seed_range, GenerateMode, GenerateOutcome};
pub use runner::{
    run_all, run_figures, run_generate, run_significance, run_surrogates, surrogate_seed,
};
pub use significance::{compare_with_surrogates, generate_p_values, save_p_values, PValueRow};
pub use terms::{ConditionKey, PidRow, PidTerm, PidTerms, SourceSet, SurrogatePidRow};
