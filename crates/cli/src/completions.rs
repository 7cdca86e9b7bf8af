// SPDX-License-Identifier: BUSL-1.1
// Copyright (c) 2026 Alfred Jean LLC

//! Shell completion generation for the sous CLI.
//!
//! ```bash
//! sous completions bash > ~/.local/share/bash-completion/completions/sous
//! sous completions zsh > ~/.zfunc/_sous
//! sous completions fish > ~/.config/fish/completions/sous.fish
//! ```

use clap::CommandFactory;
use clap_complete::{generate, Shell};
use std::io;

#[derive(clap::Args, Debug)]
pub struct CompletionsArgs {
    /// Shell to generate completions for
    #[arg(value_enum)]
    pub shell: Shell,
}

/// Write completions for the `sous` command to stdout.
pub fn generate_completions<C: CommandFactory>(shell: Shell) {
    let mut cmd = C::command();
    generate(shell, &mut cmd, "sous", &mut io::stdout());
}
