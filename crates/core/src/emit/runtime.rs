//! Shared runtime support files, copied verbatim into every output tree.

use rust_embed::RustEmbed;

use super::RenderedFile;
use super::layout::OutputLayout;

#[derive(RustEmbed)]
#[folder = "runtime/"]
struct RuntimeAssets;

/// The runtime files placed under `layout`, sorted by destination.
///
/// `java/*` goes to the runtime package of the sources tree, `js/*` to the
/// runtime package of the resources tree.
pub fn runtime_files(layout: &OutputLayout) -> Vec<RenderedFile> {
    let mut files: Vec<RenderedFile> = RuntimeAssets::iter()
        .filter_map(|name| {
            let (dir, file_name) = name.split_once('/')?;
            let dest_dir = match dir {
                "java" => layout.runtime_sources_dir(),
                "js" => layout.runtime_resources_dir(),
                _ => return None,
            };
            let asset = RuntimeAssets::get(&name)?;
            Some(RenderedFile {
                path: dest_dir.join(file_name),
                contents: String::from_utf8_lossy(&asset.data).into_owned(),
            })
        })
        .collect();
    files.sort_by(|a, b| a.path.cmp(&b.path));
    files
}
