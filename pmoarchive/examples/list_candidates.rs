//! Prints the remote fetch candidates of archive URIs
//!
//! ```bash
//! cargo run -p pmoarchive --example list_candidates -- "asma:/Games/Commando.sap" "ay:/games/Commando[CPC].ay"
//! ```

use pmoarchive::{ArchivePath, Mirror, RemoteUriResolver, Uri, logs::init_logging};
use pmoconfig::get_config;

fn main() -> Result<(), Box<dyn std::error::Error>> {
    let config = get_config();
    init_logging(&config);

    let resolver = RemoteUriResolver::new(Mirror::from_config(&config)?);
    for arg in std::env::args().skip(1) {
        let uri: Uri = arg.parse()?;
        let Some(path) = ArchivePath::resolve(&uri) else {
            tracing::warn!(uri = %uri, "Unknown archive scheme");
            continue;
        };

        let kind = if path.is_file() { "file" } else { "dir" };
        println!("{} ({}, {})", path, path.archive().title(), kind);
        for candidate in resolver.resolve(&path) {
            println!("  {}", candidate);
        }
    }
    Ok(())
}
