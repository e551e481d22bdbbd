// ── Durable session storage ──
//
// `cookiefy-api` defines the `SessionStore` contract and an in-memory
// implementation; this module adds the on-disk one used by the CLI.

mod file;

pub use file::FileSessionStore;
