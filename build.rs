//! Emits the git SHA, build timestamp and target for `--version`

use std::error::Error;

fn main() -> Result<(), Box<dyn Error>> {
    let build = vergen_gitcl::BuildBuilder::default().build_timestamp(true).build()?;
    let cargo = vergen_gitcl::CargoBuilder::default().target_triple(true).build()?;
    // Outside a git checkout vergen falls back to placeholder values.
    let git = vergen_gitcl::GitclBuilder::default().sha(true).build()?;

    vergen_gitcl::Emitter::default()
        .add_instructions(&build)?
        .add_instructions(&cargo)?
        .add_instructions(&git)?
        .emit()?;
    Ok(())
}
