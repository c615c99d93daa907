//! Terms command handler
//!
//! Shows the key terms and search queries the planner derives from a name.

use crate::error::Result;
use crate::search::terms::{enhanced_queries, key_terms};
use clap::Args;

/// Terms command arguments
#[derive(Args)]
pub struct TermsArgs {
    /// Scenic-area name
    pub name: String,
}

/// Run the terms command
pub fn run(args: TermsArgs) -> Result<()> {
    println!("Key terms:");
    for term in key_terms(&args.name) {
        println!("  {}", term);
    }

    println!();
    println!("Search queries:");
    for query in enhanced_queries(&args.name) {
        println!("  {}", query);
    }

    Ok(())
}
