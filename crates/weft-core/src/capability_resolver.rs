#![forbid(unsafe_code)]

//! Capability resolution with graceful degradation.
//!
//! Given a terminal name, [`Resolver`] finds capability data for it and
//! always produces a usable [`CapabilityStore`]:
//!
//! 1. **Terminfo** - compiled entries from the search path (configured file,
//!    configured prefix, `TERMINFO`, `TERMINFO_DIRS`, `~/.terminfo`, then the
//!    system directories). Both `x/xterm` and `78/xterm` layouts are tried.
//! 2. **Termcap** - the configured file, an inline `TERMCAP` entry, a
//!    `TERMCAP` path, `/etc/termcap`, then the bundled xterm termcap text.
//! 3. **Embedded** - the bundled compiled xterm description.
//!
//! Each failed step is recorded in [`Resolution::diagnostics`] and never
//! reaches the caller of [`Resolver::resolve`].
//!
//! Environment variables are captured once into [`EnvInputs`] so tests can
//! inject them without touching the process environment:
//!
//! ```
//! use weft_core::capability_resolver::{EnvInputs, Resolver, ResolverConfig};
//!
//! let env = EnvInputs {
//!     term: Some("xterm".into()),
//!     ..EnvInputs::default()
//! };
//! let config = ResolverConfig::default().with_system_paths(false);
//! let resolution = Resolver::new(config, env).resolve();
//!
//! assert!(resolution.store.is_terminal("xterm"));
//! assert_eq!(resolution.store.number("columns"), Some(80));
//! ```

use std::ffi::OsString;
use std::fmt;
use std::fs;
use std::path::{Path, PathBuf};

use crate::capability_store::CapabilityStore;
use crate::error::{CapsError, Result};
use crate::{termcap, terminfo};

#[cfg(feature = "tracing")]
use crate::logging::{debug, info, warn};
#[cfg(not(feature = "tracing"))]
use crate::{debug, info, warn};

/// Compiled xterm description bundled into the crate.
pub const EMBEDDED_TERMINFO: &[u8] = include_bytes!("../data/xterm");

/// Termcap text for the same description.
pub const EMBEDDED_TERMCAP: &str = include_str!("../data/xterm.termcap");

/// Terminal name used when neither the config nor `TERM` names one.
pub const DEFAULT_TERMINAL: &str = "xterm";

/// Label used for embedded data in errors and logs.
pub const EMBEDDED_LABEL: &str = "<embedded>";

/// System terminfo directories, searched in order after the user's.
pub const SYSTEM_TERMINFO_DIRS: &[&str] = &[
    "/etc/terminfo",
    "/lib/terminfo",
    "/usr/share/terminfo",
    "/usr/share/lib/terminfo",
    "/usr/lib/terminfo",
    "/usr/local/share/terminfo",
    "/usr/local/share/lib/terminfo",
    "/usr/local/lib/terminfo",
    "/usr/local/ncurses/lib/terminfo",
];

/// System termcap database.
pub const SYSTEM_TERMCAP: &str = "/etc/termcap";

const ENV_TERMINFO_PREFIX: &str = "WEFT_TERMINFO_PREFIX";
const ENV_FORCE_TERMCAP: &str = "WEFT_FORCE_TERMCAP";

// ============================================================================
// Inputs
// ============================================================================

/// Snapshot of the environment variables resolution depends on.
///
/// Directory variables are kept as OS strings, so paths that are not valid
/// UTF-8 still take part in the search.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct EnvInputs {
    /// `TERM`.
    pub term: Option<String>,
    /// `TERMINFO`: a single terminfo directory.
    pub terminfo: Option<PathBuf>,
    /// `TERMINFO_DIRS`: colon-separated directories.
    pub terminfo_dirs: Option<OsString>,
    /// `TERMCAP`: either an inline entry or a file path.
    pub termcap: Option<String>,
    /// `HOME`, for `~/.terminfo`.
    pub home: Option<PathBuf>,
}

impl EnvInputs {
    /// Read the process environment.
    #[must_use]
    pub fn from_env() -> Self {
        Self::from_env_os_with(|k| std::env::var_os(k))
    }

    /// Read through a custom lookup (for tests).
    #[must_use]
    pub fn from_env_with<F>(get_env: F) -> Self
    where
        F: Fn(&str) -> Option<String>,
    {
        Self::from_env_os_with(|key| get_env(key).map(OsString::from))
    }

    /// Read through a lookup returning raw OS strings.
    ///
    /// Empty values count as unset. `TERM` and `TERMCAP` must be UTF-8 and
    /// are dropped otherwise.
    #[must_use]
    pub fn from_env_os_with<F>(get_env: F) -> Self
    where
        F: Fn(&str) -> Option<OsString>,
    {
        let get = |key: &str| get_env(key).filter(|value| !value.is_empty());
        let text = |key: &str| {
            get(key).and_then(|value| match value.into_string() {
                Ok(value) => Some(value),
                Err(_) => {
                    debug!(variable = key, "ignoring non-UTF-8 value");
                    None
                }
            })
        };
        Self {
            term: text("TERM"),
            terminfo: get("TERMINFO").map(PathBuf::from),
            terminfo_dirs: get("TERMINFO_DIRS"),
            termcap: text("TERMCAP"),
            home: get("HOME").map(PathBuf::from),
        }
    }

    /// The `TERMCAP` value when it holds an entry rather than a path.
    #[must_use]
    pub fn inline_termcap(&self) -> Option<&str> {
        self.termcap
            .as_deref()
            .filter(|value| value.contains(':') && !value.starts_with('/'))
    }

    /// The `TERMCAP` value when it names a file.
    #[must_use]
    pub fn termcap_path(&self) -> Option<&Path> {
        match self.termcap.as_deref() {
            Some(value) if self.inline_termcap().is_none() => Some(Path::new(value)),
            _ => None,
        }
    }
}

/// Resolver configuration.
///
/// # Environment Variables
///
/// - `WEFT_TERMINFO_PREFIX`: extra terminfo directory searched first
/// - `WEFT_FORCE_TERMCAP`: "1"/"true" skips the terminfo step
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ResolverConfig {
    /// Terminal name override; takes precedence over `TERM`.
    pub terminal: Option<String>,
    /// Skip terminfo and go straight to termcap.
    pub force_termcap: bool,
    /// Terminfo directory searched before the environment's.
    pub terminfo_prefix: Option<PathBuf>,
    /// A specific compiled terminfo file to try first.
    pub terminfo_file: Option<PathBuf>,
    /// A specific termcap file to try first.
    pub termcap_file: Option<PathBuf>,
    /// Make [`Resolver::try_resolve`] fail instead of degrading.
    pub strict: bool,
    /// Search the system terminfo directories and `/etc/termcap`.
    pub system_paths: bool,
}

impl Default for ResolverConfig {
    fn default() -> Self {
        Self {
            terminal: None,
            force_termcap: false,
            terminfo_prefix: None,
            terminfo_file: None,
            termcap_file: None,
            strict: false,
            system_paths: true,
        }
    }
}

impl ResolverConfig {
    /// Load configuration from `WEFT_*` environment variables.
    #[must_use]
    pub fn from_env() -> Self {
        Self::from_env_with(|key| std::env::var(key).ok())
    }

    /// Load configuration through a custom lookup (for tests).
    #[must_use]
    pub fn from_env_with<F>(get_env: F) -> Self
    where
        F: Fn(&str) -> Option<String>,
    {
        let mut config = Self::default();

        if let Some(prefix) = get_env(ENV_TERMINFO_PREFIX) {
            config.terminfo_prefix = Some(PathBuf::from(prefix));
        }

        if let Some(val) = get_env(ENV_FORCE_TERMCAP)
            && let Some(force) = parse_bool(&val)
        {
            config.force_termcap = force;
        }

        config.validated()
    }

    /// Set the terminal name override.
    #[must_use]
    pub fn with_terminal(mut self, terminal: impl Into<String>) -> Self {
        self.terminal = Some(terminal.into());
        self
    }

    /// Skip the terminfo step.
    #[must_use]
    pub fn with_force_termcap(mut self, force: bool) -> Self {
        self.force_termcap = force;
        self
    }

    /// Search `dir` before any other terminfo directory.
    #[must_use]
    pub fn with_terminfo_prefix(mut self, dir: impl Into<PathBuf>) -> Self {
        self.terminfo_prefix = Some(dir.into());
        self
    }

    /// Try this compiled file before searching.
    #[must_use]
    pub fn with_terminfo_file(mut self, file: impl Into<PathBuf>) -> Self {
        self.terminfo_file = Some(file.into());
        self
    }

    /// Try this termcap file before the environment's.
    #[must_use]
    pub fn with_termcap_file(mut self, file: impl Into<PathBuf>) -> Self {
        self.termcap_file = Some(file.into());
        self
    }

    /// Fail from [`Resolver::try_resolve`] instead of degrading.
    #[must_use]
    pub fn with_strict(mut self, strict: bool) -> Self {
        self.strict = strict;
        self
    }

    /// Enable or disable the system search locations.
    #[must_use]
    pub fn with_system_paths(mut self, enabled: bool) -> Self {
        self.system_paths = enabled;
        self
    }

    /// Normalize the config.
    ///
    /// Trims the terminal override and drops it and any path when empty.
    #[must_use]
    pub fn validated(mut self) -> Self {
        self.terminal = self
            .terminal
            .map(|name| name.trim().to_owned())
            .filter(|name| !name.is_empty());
        let non_empty = |path: Option<PathBuf>| path.filter(|p| !p.as_os_str().is_empty());
        self.terminfo_prefix = non_empty(self.terminfo_prefix);
        self.terminfo_file = non_empty(self.terminfo_file);
        self.termcap_file = non_empty(self.termcap_file);
        self
    }
}

/// Parse a boolean environment value (`1`/`true`/`yes`/`on` and opposites).
pub(crate) fn parse_bool(value: &str) -> Option<bool> {
    match value.trim().to_ascii_lowercase().as_str() {
        "1" | "true" | "yes" | "on" => Some(true),
        "0" | "false" | "no" | "off" => Some(false),
        _ => None,
    }
}

// ============================================================================
// Outcome
// ============================================================================

/// Where a termcap entry came from.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum TermcapOrigin {
    /// The `TERMCAP` variable held the entry itself.
    Inline,
    /// A termcap file.
    File(PathBuf),
    /// The bundled termcap text.
    Embedded,
}

impl fmt::Display for TermcapOrigin {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::Inline => f.write_str("TERMCAP"),
            Self::File(path) => write!(f, "{}", path.display()),
            Self::Embedded => f.write_str(EMBEDDED_LABEL),
        }
    }
}

/// Which step of the chain produced the store.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum CapabilitySource {
    /// A compiled terminfo file.
    Terminfo(PathBuf),
    /// A termcap entry.
    Termcap(TermcapOrigin),
    /// The bundled compiled xterm description.
    Embedded,
}

impl fmt::Display for CapabilitySource {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::Terminfo(path) => write!(f, "terminfo {}", path.display()),
            Self::Termcap(origin) => write!(f, "termcap {origin}"),
            Self::Embedded => f.write_str("embedded xterm"),
        }
    }
}

/// Result of running the resolution chain.
#[derive(Debug)]
pub struct Resolution {
    /// The terminal name that was looked up.
    pub terminal: String,
    /// The capability tables.
    pub store: CapabilityStore,
    /// Which step produced `store`.
    pub source: CapabilitySource,
    /// Errors from the steps that failed, in order.
    pub diagnostics: Vec<CapsError>,
}

impl Resolution {
    /// True when the store did not come from the first step attempted.
    #[must_use]
    pub fn is_degraded(&self) -> bool {
        !self.diagnostics.is_empty()
    }
}

// ============================================================================
// Resolver
// ============================================================================

/// Runs the terminfo, termcap, embedded chain for one terminal.
#[derive(Debug, Clone, Default)]
pub struct Resolver {
    config: ResolverConfig,
    env: EnvInputs,
}

impl Resolver {
    /// Create a resolver from explicit inputs.
    #[must_use]
    pub fn new(config: ResolverConfig, env: EnvInputs) -> Self {
        Self {
            config: config.validated(),
            env,
        }
    }

    /// Create a resolver from the process environment.
    #[must_use]
    pub fn from_env() -> Self {
        Self::new(ResolverConfig::from_env(), EnvInputs::from_env())
    }

    /// The active configuration.
    #[must_use]
    pub fn config(&self) -> &ResolverConfig {
        &self.config
    }

    /// The captured environment.
    #[must_use]
    pub fn env(&self) -> &EnvInputs {
        &self.env
    }

    /// Terminal name to look up: override, then `TERM`, then `xterm`.
    ///
    /// The name keeps its case; see [`lookup_names`](Self::lookup_names).
    #[must_use]
    pub fn terminal(&self) -> String {
        self.config
            .terminal
            .as_deref()
            .or(self.env.term.as_deref().map(str::trim))
            .filter(|name| !name.is_empty())
            .unwrap_or(DEFAULT_TERMINAL)
            .to_owned()
    }

    /// Spellings of `terminal` tried by each lookup: as given, then
    /// lower-cased when that differs. Paths are used as given only.
    #[must_use]
    pub fn lookup_names(&self, terminal: &str) -> Vec<String> {
        let mut names = vec![terminal.to_owned()];
        let lower = terminal.to_ascii_lowercase();
        if !terminal.contains('/') && lower != terminal {
            names.push(lower);
        }
        names
    }

    /// Directories searched for compiled entries, in order, without duplicates.
    #[must_use]
    pub fn terminfo_dirs(&self) -> Vec<PathBuf> {
        let mut dirs: Vec<PathBuf> = Vec::new();
        let system = || {
            SYSTEM_TERMINFO_DIRS
                .iter()
                .filter(|_| self.config.system_paths)
                .map(PathBuf::from)
        };

        dirs.extend(self.config.terminfo_prefix.clone());
        dirs.extend(self.env.terminfo.clone());
        if let Some(list) = self.env.terminfo_dirs.as_deref() {
            for segment in std::env::split_paths(list) {
                if segment.as_os_str().is_empty() {
                    dirs.extend(system());
                } else {
                    dirs.push(segment);
                }
            }
        }
        dirs.extend(self.env.home.as_deref().map(|home| home.join(".terminfo")));
        dirs.extend(system());

        let mut unique = Vec::with_capacity(dirs.len());
        for dir in dirs {
            if !unique.contains(&dir) {
                unique.push(dir);
            }
        }
        unique
    }

    /// Candidate files for `terminal`, in search order.
    #[must_use]
    pub fn terminfo_candidates(&self, terminal: &str) -> Vec<PathBuf> {
        let mut files: Vec<PathBuf> = self.config.terminfo_file.iter().cloned().collect();
        if terminal.contains('/') {
            files.push(PathBuf::from(terminal));
            return files;
        }
        let Some(first) = terminal.chars().next() else {
            return files;
        };
        let letter = first.to_string();
        let hex = format!("{:x}", u32::from(first));
        for dir in self.terminfo_dirs() {
            files.push(dir.join(&letter).join(terminal));
            files.push(dir.join(&hex).join(terminal));
        }
        files
    }

    /// Termcap origins in the order they are tried.
    #[must_use]
    pub fn termcap_origins(&self) -> Vec<TermcapOrigin> {
        let mut origins = Vec::new();
        origins.extend(self.config.termcap_file.clone().map(TermcapOrigin::File));
        if self.env.inline_termcap().is_some() {
            origins.push(TermcapOrigin::Inline);
        }
        origins.extend(
            self.env
                .termcap_path()
                .map(|path| TermcapOrigin::File(path.to_path_buf())),
        );
        if self.config.system_paths {
            origins.push(TermcapOrigin::File(PathBuf::from(SYSTEM_TERMCAP)));
        }
        origins.push(TermcapOrigin::Embedded);
        origins
    }

    /// Run the full chain. Never fails.
    #[must_use]
    pub fn resolve(&self) -> Resolution {
        let terminal = self.terminal();
        let mut diagnostics = Vec::new();

        if self.config.force_termcap {
            debug!(terminal = %terminal, "terminfo skipped by configuration");
        } else {
            debug!(terminal = %terminal, "resolving via terminfo");
            match self.resolve_terminfo(&terminal, &mut diagnostics) {
                Ok((path, store)) => {
                    return self.finish(terminal, store, CapabilitySource::Terminfo(path), diagnostics);
                }
                Err(err) => {
                    warn!(terminal = %terminal, error = %err, "terminfo lookup failed, trying termcap");
                    diagnostics.push(err);
                }
            }
        }

        debug!(terminal = %terminal, "resolving via termcap");
        match self.resolve_termcap(&terminal, &mut diagnostics) {
            Ok((origin, store)) => {
                return self.finish(terminal, store, CapabilitySource::Termcap(origin), diagnostics);
            }
            Err(err) => {
                warn!(terminal = %terminal, error = %err, "termcap lookup failed, using embedded xterm");
                diagnostics.push(err);
            }
        }

        let store = match terminfo::parse(EMBEDDED_TERMINFO, EMBEDDED_LABEL) {
            Ok(store) => store,
            Err(err) => {
                diagnostics.push(err);
                CapabilityStore::builder()
                    .with_names([DEFAULT_TERMINAL])
                    .build()
            }
        };
        self.finish(terminal, store, CapabilitySource::Embedded, diagnostics)
    }

    /// Run the chain, failing on the first error when `strict` is set.
    ///
    /// Without `strict` this is [`resolve`](Self::resolve) wrapped in `Ok`.
    ///
    /// # Errors
    ///
    /// With `strict`, the first error recorded by any step.
    pub fn try_resolve(&self) -> Result<Resolution> {
        let mut resolution = self.resolve();
        if self.config.strict && !resolution.diagnostics.is_empty() {
            return Err(resolution.diagnostics.remove(0));
        }
        Ok(resolution)
    }

    fn finish(
        &self,
        terminal: String,
        store: CapabilityStore,
        source: CapabilitySource,
        diagnostics: Vec<CapsError>,
    ) -> Resolution {
        info!(
            terminal = %terminal,
            source = %source,
            capabilities = store.len(),
            failures = diagnostics.len(),
            "terminal capabilities resolved"
        );
        Resolution {
            terminal,
            store,
            source,
            diagnostics,
        }
    }

    /// Try each terminfo candidate in order, for each lookup name.
    ///
    /// Unreadable or malformed files are recorded and skipped. Returns
    /// `NotFound` when no candidate decodes.
    fn resolve_terminfo(
        &self,
        terminal: &str,
        diagnostics: &mut Vec<CapsError>,
    ) -> Result<(PathBuf, CapabilityStore)> {
        let mut candidates: Vec<PathBuf> = Vec::new();
        for name in self.lookup_names(terminal) {
            for path in self.terminfo_candidates(&name) {
                if !candidates.contains(&path) {
                    candidates.push(path);
                }
            }
        }
        for path in candidates {
            if !path.is_file() {
                continue;
            }
            debug!(path = %path.display(), "decoding terminfo candidate");
            match read_file(&path)
                .and_then(|bytes| terminfo::parse(&bytes, &path.display().to_string()))
            {
                Ok(store) => return Ok((path, store)),
                Err(err) => {
                    warn!(error = %err, "skipping terminfo candidate");
                    diagnostics.push(err);
                }
            }
        }
        Err(CapsError::not_found(terminal))
    }

    /// Try each termcap origin in order, each with every lookup name.
    fn resolve_termcap(
        &self,
        terminal: &str,
        diagnostics: &mut Vec<CapsError>,
    ) -> Result<(TermcapOrigin, CapabilityStore)> {
        let names = self.lookup_names(terminal);
        for origin in self.termcap_origins() {
            let label = origin.to_string();
            let text = match &origin {
                TermcapOrigin::Inline => match self.env.inline_termcap() {
                    Some(text) => text.to_owned(),
                    None => continue,
                },
                TermcapOrigin::File(path) => {
                    if !path.is_file() {
                        continue;
                    }
                    match read_file(path) {
                        Ok(bytes) => String::from_utf8_lossy(&bytes).into_owned(),
                        Err(err) => {
                            warn!(error = %err, "skipping termcap origin");
                            diagnostics.push(err);
                            continue;
                        }
                    }
                }
                TermcapOrigin::Embedded => EMBEDDED_TERMCAP.to_owned(),
            };
            for name in &names {
                match termcap::parse(&text, name, &label) {
                    Ok(store) => return Ok((origin, store)),
                    Err(err) if err.is_not_found() => {
                        debug!(origin = %label, name = %name, "no termcap entry");
                    }
                    Err(err) => {
                        warn!(error = %err, "skipping termcap origin");
                        diagnostics.push(err);
                        break;
                    }
                }
            }
        }
        Err(CapsError::not_found(terminal))
    }
}

fn read_file(path: &Path) -> Result<Vec<u8>> {
    fs::read(path).map_err(|source| CapsError::Io {
        path: path.to_path_buf(),
        source,
    })
}
