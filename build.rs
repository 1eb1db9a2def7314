use vergen::{BuildBuilder, Emitter};
use vergen_git2::Git2Builder;

// Emits VERGEN_BUILD_DATE and VERGEN_GIT_DESCRIBE for `keyway --version`.
fn main() -> Result<(), Box<dyn std::error::Error>> {
    let build = BuildBuilder::default().build_date(true).build()?;

    let git2_result = Git2Builder::default().describe(true, true, None).build();

    match git2_result {
        Ok(git2) => {
            Emitter::default()
                .add_instructions(&build)?
                .add_instructions(&git2)?
                .emit()?;
        }
        Err(_) => {
            // crates.io tarballs carry no git metadata
            println!("cargo:rustc-env=VERGEN_GIT_DESCRIBE=unknown");
            Emitter::default().add_instructions(&build)?.emit()?;
        }
    }

    Ok(())
}
