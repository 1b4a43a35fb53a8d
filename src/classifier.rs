use std::sync::OnceLock;

use fancy_regex::Regex as FancyRegex;

use crate::error::Result;
use crate::helpers::to_pascal_word;
use crate::os_helpers::{parse_apple_os, parse_linux_os};
use crate::signatures::SignatureTable;
use crate::tokenizer::{scrub_line_breaks, split_sub_tokens, split_tokens};
use crate::types::{ClientInfo, Device, DeviceFamily, FamilyVersion, ParseResult};

// ---------------------------------------------------------------------------
// Accumulator: classification state threaded through the token fold
// ---------------------------------------------------------------------------

/// Classification state accumulated over one forward pass of the tokens.
/// OS and client are kept as raw `"Name/version"` strings until assembly.
#[derive(Debug, Default)]
pub(crate) struct Accumulator {
    os: Option<String>,
    client: Option<String>,
    language: Option<String>,
    /// Chrome-family token held back as a fallback client candidate.
    chrome: Option<String>,
    family: DeviceFamily,
    company: Option<String>,
    brand: Option<String>,
    model: Option<String>,
}

/// One sub-token of the parenthetical descriptor block, with its neighbours.
pub(crate) struct SubTokenCtx<'a> {
    token: &'a str,
    prev: Option<&'a str>,
    next: Option<&'a str>,
    is_last: bool,
}

/// One top-level token with its position in the sequence.
pub(crate) struct TokenCtx<'a> {
    token: &'a str,
    index: usize,
    count: usize,
}

/// How far a sub-token rule moved the cursor; `Two` means the rule consumed
/// the following sub-token as a paired value.
#[derive(Clone, Copy)]
pub(crate) enum Advance {
    One = 1,
    Two = 2,
}

// ---------------------------------------------------------------------------
// Sub-token rules: ordered cascade over the OS/device descriptor block
// ---------------------------------------------------------------------------

type RuleFn = fn(&UaClassifier, &SubTokenCtx<'_>, &mut Accumulator) -> Option<Advance>;

/// A named entry in the descriptor cascade.  Returns `None` when the rule
/// does not apply; the first rule that returns `Some` wins for the sub-token.
pub(crate) struct SubTokenRule {
    pub name: &'static str,
    pub run: RuleFn,
}

/// Priority order matters: earlier rules shadow later ones per sub-token.
pub(crate) const SUB_TOKEN_RULES: &[SubTokenRule] = &[
    SubTokenRule { name: "bot-marker", run: bot_marker },
    SubTokenRule { name: "language-code", run: language_code },
    SubTokenRule { name: "windows-os", run: windows_os },
    SubTokenRule { name: "msie-client", run: msie_client },
    SubTokenRule { name: "trident-client", run: trident_client },
    SubTokenRule { name: "mobile-flag", run: mobile_flag },
    SubTokenRule { name: "tablet-flag", run: tablet_flag },
    SubTokenRule { name: "smart-tv-flag", run: smart_tv_flag },
    SubTokenRule { name: "apple-tv", run: apple_tv },
    SubTokenRule { name: "macintosh", run: macintosh },
    SubTokenRule { name: "iphone", run: iphone },
    SubTokenRule { name: "ipad-ipod", run: ipad_ipod },
    SubTokenRule { name: "x11-linux", run: x11_linux },
    SubTokenRule { name: "bare-linux", run: bare_linux },
    SubTokenRule { name: "android-os", run: android_os },
    SubTokenRule { name: "gecko-release", run: gecko_release },
    SubTokenRule { name: "trailing-descriptor", run: trailing_descriptor },
];

/// A `+http` site-verification URL marks a crawler; the identifier right
/// before it, when present, is the client.
fn bot_marker(_: &UaClassifier, ctx: &SubTokenCtx<'_>, acc: &mut Accumulator) -> Option<Advance> {
    if !ctx.token.starts_with("+http") {
        return None;
    }
    acc.family = DeviceFamily::Bot;
    if let Some(prev) = ctx.prev {
        acc.client = Some(prev.to_string());
    }
    Some(Advance::One)
}

fn language_code(
    cls: &UaClassifier,
    ctx: &SubTokenCtx<'_>,
    acc: &mut Accumulator,
) -> Option<Advance> {
    let len = ctx.token.len();
    if (len == 2 || len == 5) && cls.language_re.is_match(ctx.token) {
        acc.language = Some(ctx.token.to_string());
        return Some(Advance::One);
    }
    None
}

fn windows_os(_: &UaClassifier, ctx: &SubTokenCtx<'_>, acc: &mut Accumulator) -> Option<Advance> {
    if !ctx.token.starts_with("Windows ") {
        return None;
    }
    let name = match ctx.token {
        "Windows NT 5.0" => "Windows 2000",
        "Windows NT 5.1" => "Windows XP",
        "Windows NT 5.2" => "Windows Server 2003",
        "Windows NT 6.0" => "Windows Vista",
        "Windows NT 6.1" => "Windows 7",
        "Windows NT 6.2" => "Windows 8",
        "Windows NT 6.3" => "Windows 8.1",
        "Windows NT 10.0" => "Windows 10",
        other => other,
    };
    // The trailing numeric token doubles as the version fragment.
    let version = ctx.token.rsplit(' ').next().unwrap_or("");
    acc.os = Some(format!("{name}/{version}"));
    Some(Advance::One)
}

fn msie_client(_: &UaClassifier, ctx: &SubTokenCtx<'_>, acc: &mut Accumulator) -> Option<Advance> {
    if !ctx.token.starts_with("MSIE ") {
        return None;
    }
    acc.client = Some(ctx.token.replace(' ', "/"));
    Some(Advance::One)
}

/// IE 8+ hides behind a Trident engine token; the MSIE version lags the
/// Trident version by exactly 4.
fn trident_client(
    _: &UaClassifier,
    ctx: &SubTokenCtx<'_>,
    acc: &mut Accumulator,
) -> Option<Advance> {
    let rest = ctx.token.strip_prefix("Trident/")?;
    let rest = rest.split('/').next().unwrap_or("");
    let mut components = rest.splitn(2, '.');
    if let Some(major) = components
        .next()
        .unwrap_or("")
        .parse::<u32>()
        .ok()
        .and_then(|major| major.checked_add(4))
    {
        acc.client = Some(match components.next() {
            Some(frac) => format!("MSIE/{major}.{frac}"),
            None => format!("MSIE/{major}"),
        });
    }
    Some(Advance::One)
}

fn mobile_flag(_: &UaClassifier, ctx: &SubTokenCtx<'_>, acc: &mut Accumulator) -> Option<Advance> {
    if !ctx.token.eq_ignore_ascii_case("Mobile") {
        return None;
    }
    acc.family = DeviceFamily::Mobile;
    Some(Advance::One)
}

fn tablet_flag(_: &UaClassifier, ctx: &SubTokenCtx<'_>, acc: &mut Accumulator) -> Option<Advance> {
    if !ctx.token.eq_ignore_ascii_case("Tablet") {
        return None;
    }
    acc.family = DeviceFamily::Tablet;
    Some(Advance::One)
}

fn smart_tv_flag(
    _: &UaClassifier,
    ctx: &SubTokenCtx<'_>,
    acc: &mut Accumulator,
) -> Option<Advance> {
    if !ctx.token.eq_ignore_ascii_case("SMART-TV") {
        return None;
    }
    acc.family = DeviceFamily::Tv;
    Some(Advance::One)
}

fn apple_tv(_: &UaClassifier, ctx: &SubTokenCtx<'_>, acc: &mut Accumulator) -> Option<Advance> {
    if !ctx.token.eq_ignore_ascii_case("Apple TV") {
        return None;
    }
    acc.company = Some("Apple".to_string());
    acc.family = DeviceFamily::Tv;
    Some(Advance::One)
}

fn macintosh(cls: &UaClassifier, ctx: &SubTokenCtx<'_>, acc: &mut Accumulator) -> Option<Advance> {
    if !ctx.token.eq_ignore_ascii_case("Macintosh") {
        return None;
    }
    consume_apple(cls, ctx, acc);
    Some(Advance::Two)
}

fn iphone(cls: &UaClassifier, ctx: &SubTokenCtx<'_>, acc: &mut Accumulator) -> Option<Advance> {
    if !ctx.token.eq_ignore_ascii_case("iPhone") {
        return None;
    }
    acc.family = DeviceFamily::Mobile;
    consume_apple(cls, ctx, acc);
    Some(Advance::Two)
}

fn ipad_ipod(cls: &UaClassifier, ctx: &SubTokenCtx<'_>, acc: &mut Accumulator) -> Option<Advance> {
    if !ctx.token.eq_ignore_ascii_case("iPad") && !ctx.token.eq_ignore_ascii_case("iPod") {
        return None;
    }
    acc.family = DeviceFamily::Tablet;
    consume_apple(cls, ctx, acc);
    Some(Advance::Two)
}

/// Shared tail of the Apple hardware rules: brand the device and consume the
/// following sub-token as the OS descriptor.  A missing pair leaves the OS
/// untouched rather than failing the parse.
fn consume_apple(cls: &UaClassifier, ctx: &SubTokenCtx<'_>, acc: &mut Accumulator) {
    acc.company = Some("Apple".to_string());
    acc.brand = Some(ctx.token.to_string());
    if let Some(next) = ctx.next {
        acc.os = parse_apple_os(&cls.version_re, next);
    }
}

fn x11_linux(cls: &UaClassifier, ctx: &SubTokenCtx<'_>, acc: &mut Accumulator) -> Option<Advance> {
    if ctx.token != "X11" {
        return None;
    }
    if let Some(next) = ctx.next {
        acc.os = Some(parse_linux_os(&cls.version_re, next));
    }
    Some(Advance::Two)
}

fn bare_linux(cls: &UaClassifier, ctx: &SubTokenCtx<'_>, acc: &mut Accumulator) -> Option<Advance> {
    if acc.os.is_some() || !ctx.token.starts_with("Linux") {
        return None;
    }
    acc.os = Some(parse_linux_os(&cls.version_re, ctx.token));
    Some(Advance::One)
}

fn android_os(_: &UaClassifier, ctx: &SubTokenCtx<'_>, acc: &mut Accumulator) -> Option<Advance> {
    if !ctx.token.starts_with("Android") {
        return None;
    }
    acc.family = DeviceFamily::Mobile;
    acc.os = Some(ctx.token.replace(' ', "/"));
    Some(Advance::One)
}

/// `rv:` is Gecko's release-version marker, not an authoritative signal.
fn gecko_release(
    _: &UaClassifier,
    ctx: &SubTokenCtx<'_>,
    _: &mut Accumulator,
) -> Option<Advance> {
    ctx.token.starts_with("rv:").then_some(Advance::One)
}

/// Whatever reaches the last sub-token unclaimed is either an OS string
/// (when it carries a version pattern) or a `company model` descriptor.
fn trailing_descriptor(
    cls: &UaClassifier,
    ctx: &SubTokenCtx<'_>,
    acc: &mut Accumulator,
) -> Option<Advance> {
    if !ctx.is_last {
        return None;
    }
    if cls.version_re.is_match(ctx.token).unwrap_or(false) {
        acc.os = Some(ctx.token.replace(' ', "/"));
        return Some(Advance::One);
    }

    let descriptor = match ctx.token.find(" Build/") {
        Some(pos) => &ctx.token[..pos],
        None => ctx.token,
    };
    let words: Vec<&str> = descriptor.split(' ').collect();
    if words.len() > 1 {
        acc.company = Some(to_pascal_word(words[0]));
    }
    acc.model = words.last().map(|w| w.to_string());
    Some(Advance::One)
}

// ---------------------------------------------------------------------------
// UaClassifier
// ---------------------------------------------------------------------------

/// Heuristic User-Agent classifier.  All patterns and the signature table
/// are compiled once at construction; parsing itself is pure and infallible,
/// so a single instance can serve unlimited concurrent callers.
pub struct UaClassifier {
    /// Anchored locale code: `aa` or `aa-AA`.
    language_re: regex::Regex,
    /// Version fragment: digits after a space or slash, dot/underscore runs.
    version_re: FancyRegex,
    /// Camel-case boundary: an uppercase letter glued to a previous word.
    word_re: FancyRegex,
    signatures: SignatureTable,
}

impl UaClassifier {
    pub fn new() -> Result<Self> {
        Ok(Self {
            language_re: regex::Regex::new(r"^[a-z]{2}(-[A-Z]{2})?$")?,
            version_re: FancyRegex::new(r"(?<=[\s/])\d+(?:[._]\d+)*")?,
            word_re: FancyRegex::new(r"(?<=\S)([A-Z])")?,
            signatures: SignatureTable::build()?,
        })
    }

    /// Process-wide shared instance, built on first use.
    pub fn shared() -> &'static UaClassifier {
        static SHARED: OnceLock<UaClassifier> = OnceLock::new();
        SHARED.get_or_init(|| UaClassifier::new().expect("built-in patterns compile"))
    }

    /// Classify a raw User-Agent header value.  An empty input yields an
    /// invalid result; everything else yields a best-effort classification,
    /// never an error.
    pub fn parse(&self, ua: &str) -> ParseResult {
        if ua.is_empty() {
            return ParseResult::invalid();
        }

        let ua = scrub_line_breaks(ua);
        let tokens = split_tokens(ua.as_ref());
        let count = tokens.len();

        if count == 1 {
            // Bare product token like "PostmanRuntime/6.7.1": re-space the
            // name and read the whole thing as the client fragment.
            let respaced = self.respace_words(&tokens[0].replace('-', " "));
            return ParseResult {
                valid: true,
                is_bot: false,
                is_mobile: false,
                source: Some(ua.into_owned()),
                device: Some(Device::with_family(DeviceFamily::Computer)),
                os: None,
                client: Some(ClientInfo {
                    info: FamilyVersion::parse(&respaced),
                    language: None,
                }),
            };
        }

        let acc = tokens
            .iter()
            .enumerate()
            .fold(Accumulator::default(), |acc, (index, token)| {
                self.apply_token(acc, &TokenCtx { token, index, count })
            });
        self.assemble(ua.into_owned(), acc)
    }

    /// Transition function for one top-level token: first-match within the
    /// token, plus the final-token client fallback.
    pub(crate) fn apply_token(&self, mut acc: Accumulator, ctx: &TokenCtx<'_>) -> Accumulator {
        let part = ctx.token;

        if ctx.index == 0 && !part.starts_with("Mozilla/") {
            // Legacy browsers self-identify first ("Opera/9.60 ...").
            acc.client = Some(part.to_string());
        } else if ctx.index == 1 && part.starts_with('(') && part.ends_with(')') {
            self.scan_descriptor(&split_sub_tokens(part), &mut acc);
        } else if part.starts_with("Language/") {
            // Some embedded WebViews (WeChat) pass the locale as its own token.
            acc.language = part.split('/').nth(1).map(str::to_string);
        } else if part.starts_with("Chrome/") {
            acc.chrome = Some(part.to_string());
        } else if part.starts_with("FxiOS/") {
            acc.client = Some(part.replace("FxiOS", "iOS Firefox"));
        } else if part.starts_with("SamsungBrowser/") {
            acc.client = Some(part.to_string());
        } else if acc.family == DeviceFamily::Computer && part.contains("Mobile") {
            // Lowest-priority family signal: a bare substring anywhere in a
            // later token, honored only while nothing stronger has fired.
            acc.family = DeviceFamily::Mobile;
        } else if acc.family == DeviceFamily::Computer && part.contains("Tablet") {
            acc.family = DeviceFamily::Tablet;
        } else if acc.family == DeviceFamily::Computer && part.contains("TV") {
            acc.family = DeviceFamily::Tv;
        }

        if ctx.index > 1 && ctx.index + 1 == ctx.count && acc.client.is_none() {
            if part.starts_with("Safari/") {
                // Chromium browsers close with a Safari compatibility token;
                // the true client is the Chrome token seen earlier.
                acc.client = Some(acc.chrome.clone().unwrap_or_else(|| part.to_string()));
            } else {
                acc.client = Some(part.replace("OPR/", "Opera/").replace("Edg/", "Edge/"));
            }
        }

        acc
    }

    /// Walk the descriptor block's sub-tokens through the ordered rule
    /// cascade; rules may consume their following sub-token.
    pub(crate) fn scan_descriptor(&self, subs: &[&str], acc: &mut Accumulator) {
        let mut s = 0;
        while s < subs.len() {
            let ctx = SubTokenCtx {
                token: subs[s],
                prev: (s > 0).then(|| subs[s - 1]),
                next: subs.get(s + 1).copied(),
                is_last: s + 1 == subs.len(),
            };
            let mut advance = Advance::One;
            for rule in SUB_TOKEN_RULES {
                if let Some(step) = (rule.run)(self, &ctx, acc) {
                    advance = step;
                    break;
                }
            }
            s += advance as usize;
        }
    }

    /// Turn accumulated strings into the final structured result: version
    /// fragments parsed, model signatures applied, booleans derived.
    fn assemble(&self, source: String, acc: Accumulator) -> ParseResult {
        let Accumulator {
            os,
            client,
            language,
            chrome: _,
            mut family,
            mut company,
            mut brand,
            model,
        } = acc;

        if let Some(model) = model.as_deref() {
            if let Some(rule) = self.signatures.lookup(model) {
                family = rule.family;
                if let Some(c) = rule.company {
                    company = Some(c.to_string());
                }
                if let Some(b) = rule.brand {
                    brand = Some(b.to_string());
                }
            }
        }

        ParseResult {
            valid: true,
            is_bot: family == DeviceFamily::Bot,
            is_mobile: family == DeviceFamily::Mobile,
            source: Some(source),
            device: Some(Device {
                family,
                company,
                brand,
                model,
            }),
            os: os.map(|os| FamilyVersion::parse(&os)),
            client: client.map(|client| ClientInfo {
                info: FamilyVersion::parse(&client),
                language,
            }),
        }
    }

    fn respace_words(&self, s: &str) -> String {
        self.word_re.replace_all(s, " $1").into_owned()
    }
}
