//! Deterministic identifier, short-name and GUID synthesis.
//!
//! Every function here is a pure function of its arguments: no counters, no
//! shared state. Recompiling the same source therefore yields byte-identical
//! identifiers, and sections can be analyzed on independent threads.

use sha2::{Digest, Sha256};
use uuid::Uuid;

use tessera_core::{
    identifier::Identifier,
    platform::{Platform, PlatformSet},
};

use crate::validate;

/// The 64-symbol identifier alphabet.
const IDENTIFIER_ALPHABET: &[u8; 64] =
    b"ABCDEFGHIJKLMNOPQRSTUVWXYZabcdefghijklmnopqrstuvwxyz0123456789._";

/// Alphabet for generated short names; `.` is replaced since it separates the extension.
const SHORT_NAME_ALPHABET: &[u8; 64] =
    b"ABCDEFGHIJKLMNOPQRSTUVWXYZabcdefghijklmnopqrstuvwxyz0123456789-_";

/// Digest bytes kept for generated identifiers (encodes to 27 characters).
const HASH_BYTES: usize = 20;

const MAX_PREFIX_LEN: usize = 3;

const SHORT_NAME_LEN: usize = 8;

const MAX_EXTENSION_LEN: usize = 3;

/// Namespace for GUIDs generated for components from their key paths.
pub const COMPONENT_GUID_NAMESPACE: Uuid = Uuid::from_u128(0x3064e5c6_fb63_4fe9_ac49_e446a792efa5);

/// Generates a version-3 name-based GUID.
///
/// The value is hashed as UTF-16LE together with the namespace, and the
/// result is rendered upper case inside braces.
///
/// # Examples
///
/// ```
/// use tessera_compiler::identifiers::generate_guid;
/// use uuid::Uuid;
///
/// let first = generate_guid(&Uuid::NAMESPACE_URL, "component/MainExe");
/// let again = generate_guid(&Uuid::NAMESPACE_URL, "component/MainExe");
/// assert_eq!(first, again);
/// assert!(first.starts_with('{') && first.ends_with('}'));
/// assert_eq!(first, first.to_uppercase());
/// ```
pub fn generate_guid(namespace: &Uuid, value: &str) -> String {
    let bytes: Vec<u8> = value.encode_utf16().flat_map(u16::to_le_bytes).collect();
    Uuid::new_v3(namespace, &bytes)
        .braced()
        .to_string()
        .to_ascii_uppercase()
}

/// Generates a private identifier from a short prefix and hashed parts.
///
/// The prefix keeps at most three identifier characters and is adjusted so
/// that the result always satisfies the identifier grammar. The parts are
/// joined with `|` and hashed with SHA-256.
///
/// # Examples
///
/// ```
/// use tessera_compiler::{identifiers::generate_identifier, validate::is_valid_identifier};
///
/// let id = generate_identifier("reg", ["MainComponent", "2", "software\\vendor", ""]);
/// assert!(id.id().starts_with("reg"));
/// assert_eq!(id.id().len(), 3 + 27);
/// assert!(is_valid_identifier(id.id()));
///
/// let again = generate_identifier("reg", ["MainComponent", "2", "software\\vendor", ""]);
/// assert_eq!(id, again);
/// ```
pub fn generate_identifier<I, S>(prefix: &str, parts: I) -> Identifier
where
    I: IntoIterator<Item = S>,
    S: AsRef<str>,
{
    let digest = hash_parts(parts);
    let encoded = encode(&digest[..HASH_BYTES], IDENTIFIER_ALPHABET);
    Identifier::private(format!("{}{}", sanitize_prefix(prefix), encoded))
}

/// Generates a private identifier from a file name.
///
/// Characters outside the identifier alphabet become `_`, and a leading `_`
/// is added when the name does not start with a letter or underscore.
///
/// # Examples
///
/// ```
/// use tessera_compiler::identifiers::generate_identifier_from_filename;
///
/// assert_eq!(generate_identifier_from_filename("setup-x64.exe").id(), "setup_x64.exe");
/// assert_eq!(generate_identifier_from_filename("7zip.dll").id(), "_7zip.dll");
/// ```
pub fn generate_identifier_from_filename(filename: &str) -> Identifier {
    let mut id: String = filename
        .chars()
        .map(|c| if is_identifier_char(c) { c } else { '_' })
        .collect();
    if !id.starts_with(|c: char| c.is_ascii_alphabetic() || c == '_') {
        id.insert(0, '_');
    }
    Identifier::private(id)
}

/// Appends the platform suffix to `name` when `current` is supported.
///
/// Returns `None` when no specialization exists for the current platform;
/// callers skip platform-specific wiring in that case.
///
/// # Examples
///
/// ```
/// use tessera_compiler::identifiers::generate_platform_identifier;
/// use tessera_core::platform::{Platform, PlatformSet};
///
/// let supported = PlatformSet::X86 | PlatformSet::X64;
/// let id = generate_platform_identifier("Foo", Platform::X86, supported);
/// assert_eq!(id.map(|id| id.into_id()), Some("Foo_X86".to_string()));
/// assert!(generate_platform_identifier("Foo", Platform::Arm64, supported).is_none());
/// ```
pub fn generate_platform_identifier(
    name: &str,
    current: Platform,
    supported: PlatformSet,
) -> Option<Identifier> {
    supported
        .contains(current)
        .then(|| Identifier::private(format!("{name}{}", current.identifier_suffix())))
}

/// Generates a deterministic 8.3 short name for `long_name`.
///
/// The long name is lower-cased unless it is a localization reference. When
/// `keep_extension` is set, up to three characters of the long name's
/// extension are kept if the result stays a legal short name.
///
/// # Examples
///
/// ```
/// use tessera_compiler::{identifiers::generate_short_name, validate::is_valid_short_filename};
///
/// let short = generate_short_name("Application Settings.config", true, false, ["File"]);
/// assert!(short.ends_with(".con"));
/// assert!(is_valid_short_filename(&short, false));
/// assert_eq!(short, generate_short_name("APPLICATION SETTINGS.CONFIG", true, false, ["File"]));
/// ```
pub fn generate_short_name<I, S>(
    long_name: &str,
    keep_extension: bool,
    allow_wildcards: bool,
    args: I,
) -> String
where
    I: IntoIterator<Item = S>,
    S: AsRef<str>,
{
    let key = if validate::is_valid_loc_identifier(long_name) {
        long_name.to_string()
    } else {
        long_name.to_lowercase()
    };
    let args: Vec<S> = args.into_iter().collect();
    let parts = std::iter::once(key.as_str()).chain(args.iter().map(AsRef::as_ref));
    let digest = hash_parts(parts);

    let mut short: String = encode(&digest[..HASH_BYTES], SHORT_NAME_ALPHABET)
        .chars()
        .take(SHORT_NAME_LEN)
        .collect::<String>()
        .to_lowercase();

    let extension = long_name
        .rsplit_once('.')
        .map(|(_, extension)| extension)
        .filter(|extension| keep_extension && !extension.is_empty());
    if let Some(extension) = extension {
        let extension: String = extension
            .chars()
            .take(MAX_EXTENSION_LEN)
            .collect::<String>()
            .to_lowercase();
        let candidate = format!("{short}.{extension}");
        if validate::is_valid_short_filename(&candidate, allow_wildcards) {
            short = candidate;
        }
    }

    short
}

fn is_identifier_char(c: char) -> bool {
    c.is_ascii_alphanumeric() || c == '_' || c == '.'
}

fn sanitize_prefix(prefix: &str) -> String {
    let mut sanitized: String = prefix
        .chars()
        .filter(|c| is_identifier_char(*c))
        .take(MAX_PREFIX_LEN)
        .collect();
    if !sanitized.starts_with(|c: char| c.is_ascii_alphabetic() || c == '_') {
        sanitized.insert(0, '_');
    }
    sanitized
}

fn hash_parts<I, S>(parts: I) -> [u8; 32]
where
    I: IntoIterator<Item = S>,
    S: AsRef<str>,
{
    let mut hasher = Sha256::new();
    for (index, part) in parts.into_iter().enumerate() {
        if index > 0 {
            hasher.update(b"|");
        }
        hasher.update(part.as_ref().as_bytes());
    }
    hasher.finalize().into()
}

/// Encodes bytes six bits at a time over a 64-symbol alphabet.
fn encode(bytes: &[u8], alphabet: &[u8; 64]) -> String {
    let mut out = String::with_capacity((bytes.len() * 8).div_ceil(6));
    let mut buffer: u32 = 0;
    let mut bits = 0;
    for &byte in bytes {
        buffer = ((buffer << 8) | u32::from(byte)) & 0xFFFF;
        bits += 8;
        while bits >= 6 {
            bits -= 6;
            out.push(char::from(alphabet[((buffer >> bits) & 0x3F) as usize]));
        }
    }
    if bits > 0 {
        out.push(char::from(alphabet[((buffer << (6 - bits)) & 0x3F) as usize]));
    }
    out
}
