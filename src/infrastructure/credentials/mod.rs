//! Credentials management infrastructure
//!
//! Resolves locality/service scoped API keys and mailbox logins, plus the
//! global IMAP, Azure, OpenAI and path settings, from an environment
//! snapshot. A `.env` file is loaded into the process environment by the
//! binary before the snapshot is taken.

pub mod resolver;

pub use resolver::CredentialResolver;
