//! IPFS image reference rewriting

/// Public gateway used when none is configured
pub const DEFAULT_IPFS_GATEWAY: &str = "https://cf-ipfs.com/ipfs/";

const IPFS_SCHEME: &str = "ipfs://";

/// Rewrite an `ipfs://` image reference into an HTTP gateway URL.
///
/// Only a leading scheme is replaced; any other reference is returned unchanged.
pub fn resolve_ipfs_url(image: &str, gateway: &str) -> String {
    match image.strip_prefix(IPFS_SCHEME) {
        Some(cid_path) => format!("{}{}", gateway, cid_path),
        None => image.to_string(),
    }
}
