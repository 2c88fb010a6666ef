//! Canonical face states and the string resolver.
//!
//! The declaration order of [`FaceState`] is the index used by every theme's
//! bitmap table and must not change.

use strum::{EnumCount, IntoEnumIterator};

#[derive(
    Debug,
    Clone,
    Copy,
    PartialEq,
    Eq,
    Hash,
    PartialOrd,
    Ord,
    Default,
    strum_macros::EnumCount,
    strum_macros::EnumIter,
    strum_macros::IntoStaticStr,
)]
#[strum(serialize_all = "SCREAMING_SNAKE_CASE")]
pub enum FaceState {
    // Static expressions
    #[default]
    Happy,
    Sad,
    Angry,
    Excited,
    Grateful,
    Lonely,
    Cool,
    Intense,
    Smart,
    Friend,
    Broken,
    Debug,
    Demotivated,

    // Looking around
    #[strum(serialize = "LOOK_L")]
    LookL,
    #[strum(serialize = "LOOK_R")]
    LookR,
    #[strum(serialize = "LOOK_L_HAPPY")]
    LookLHappy,
    #[strum(serialize = "LOOK_R_HAPPY")]
    LookRHappy,

    // Sleep cycle
    #[strum(serialize = "SLEEP1")]
    Sleep1,
    #[strum(serialize = "SLEEP2")]
    Sleep2,
    #[strum(serialize = "SLEEP3")]
    Sleep3,
    #[strum(serialize = "SLEEP4")]
    Sleep4,

    // Binary eyes for upload/download
    #[strum(serialize = "UPLOAD_00")]
    Upload00,
    #[strum(serialize = "UPLOAD_01")]
    Upload01,
    #[strum(serialize = "UPLOAD_10")]
    Upload10,
    #[strum(serialize = "UPLOAD_11")]
    Upload11,
}

pub const FACE_STATE_COUNT: usize = FaceState::COUNT;

/// Longest file stem the path resolver will consider.
const MAX_NAME_LEN: usize = 31;

/// Historical emoticons and legacy state names, matched exactly.
static LEGACY_TOKENS: &[(&str, FaceState)] = &[
    // Happy
    ("(◕‿‿◕)", FaceState::Happy),
    ("(◕‿◕)", FaceState::Happy),
    ("(^_^)", FaceState::Happy),
    ("(◕◡◕)", FaceState::Happy),
    ("(•‿•)", FaceState::Happy),
    ("(◕ᴗ◕)", FaceState::Excited),
    ("(ᵔ◡ᵔ)", FaceState::Excited),
    ("(☼‿‿☼)", FaceState::Excited),
    ("(•̀ᴗ•́)و", FaceState::Excited),
    // Cool
    ("(⌐■_■)", FaceState::Cool),
    ("(≖‿‿≖)", FaceState::Cool),
    // Looking
    ("( ⚆_⚆)", FaceState::LookR),
    ("( ⚆_⚆ )", FaceState::LookR),
    ("(⚆_⚆ )", FaceState::LookL),
    ("( ◕‿◕)", FaceState::LookRHappy),
    ("(◕‿◕ )", FaceState::LookLHappy),
    // Sleeping
    ("(⇀‿‿↼)", FaceState::Sleep1),
    ("(-_-) zzZ", FaceState::Sleep1),
    ("(－_－) zzZ", FaceState::Sleep1),
    ("(￣o￣) zzZ", FaceState::Sleep2),
    // Sad
    ("(;_;)", FaceState::Sad),
    ("(T_T)", FaceState::Sad),
    ("(╥☁╥)", FaceState::Sad),
    ("(╥﹏╥)", FaceState::Sad),
    ("(;﹏;)", FaceState::Sad),
    // Angry
    ("(>_<)", FaceState::Angry),
    ("(-_-')", FaceState::Angry),
    ("(ಠ_ಠ)", FaceState::Angry),
    // Bored
    ("(-_-)", FaceState::Demotivated),
    ("(¬_¬)", FaceState::Demotivated),
    ("(－‸ლ)", FaceState::Demotivated),
    ("(≖__≖)", FaceState::Demotivated),
    // Intense
    ("(ง'̀-'́)ง", FaceState::Intense),
    ("(ง •̀_•́)ง", FaceState::Intense),
    ("(♥‿‿♥)", FaceState::Friend),
    ("(☓‿‿☓)", FaceState::Broken),
    ("(×_×)", FaceState::Broken),
    ("(x_x)", FaceState::Broken),
    ("(ب__ب)", FaceState::Lonely),
    ("(✜‿‿✜)", FaceState::Smart),
    ("(^‿‿^)", FaceState::Grateful),
    ("(#__#)", FaceState::Debug),
    // Binary eyes
    ("(0__0)", FaceState::Upload00),
    ("(0__1)", FaceState::Upload01),
    ("(1__0)", FaceState::Upload10),
    ("(1__1)", FaceState::Upload11),
    // State names used by older theme packs
    ("SLEEP", FaceState::Sleep1),
    ("AWAKE", FaceState::Happy),
    ("BORED", FaceState::Demotivated),
    ("MOTIVATED", FaceState::Excited),
    ("UPLOAD", FaceState::Upload10),
    ("UPLOAD1", FaceState::Upload11),
    ("UPLOAD2", FaceState::Upload01),
];

impl FaceState {
    /// Canonical upper-case name, also the PNG file stem.
    pub fn name(self) -> &'static str {
        self.into()
    }

    pub fn index(self) -> usize {
        self as usize
    }

    pub fn from_index(index: usize) -> Option<Self> {
        FaceState::iter().nth(index)
    }

    pub fn from_name(name: &str) -> Option<Self> {
        FaceState::iter().find(|state| state.name().eq_ignore_ascii_case(name))
    }

    /// File name this state is probed under inside a theme.
    pub fn file_name(self, lowercase: bool) -> alloc::string::String {
        let mut name = alloc::string::String::from(self.name());
        if lowercase {
            name.make_ascii_lowercase();
        }
        name.push_str(".png");
        name
    }

    /// ASCII emoticon used when no theme bitmap is available.
    pub fn fallback_text(self) -> &'static str {
        match self {
            FaceState::Happy => "(^_^)",
            FaceState::Sad => "(;_;)",
            FaceState::Angry => "(>_<)",
            FaceState::Excited => "(^o^)",
            FaceState::Grateful => "(^-^)",
            FaceState::Lonely => "(._.)",
            FaceState::Cool => "(B-)",
            FaceState::Intense => "(o_O)",
            FaceState::Smart => "(@_@)",
            FaceState::Friend => "(<3_<3)",
            FaceState::Broken => "(x_x)",
            FaceState::Debug => "(#_#)",
            FaceState::Demotivated => "(-_-)",
            FaceState::LookL => "(o_o )",
            FaceState::LookR => "( o_o)",
            FaceState::LookLHappy => "(^_^ )",
            FaceState::LookRHappy => "( ^_^)",
            FaceState::Sleep1 => "(-_-) z",
            FaceState::Sleep2 => "(-_-) zz",
            FaceState::Sleep3 => "(-_-) zzZ",
            FaceState::Sleep4 => "(-_-) zzZZ",
            FaceState::Upload00 => "(0__0)",
            FaceState::Upload01 => "(0__1)",
            FaceState::Upload10 => "(1__0)",
            FaceState::Upload11 => "(1__1)",
        }
    }
}

/// Maps any caller-supplied face token onto a canonical state.
///
/// Accepts a path ending in `.png`/`.PNG` (`/x/y/SAD.png`), a bare state
/// name in any case (`sad`), or a legacy emoticon (`(;_;)`). Anything else,
/// including the empty string, yields [`FaceState::Happy`]; an explicit
/// `HAPPY` and an unknown token are indistinguishable to the caller.
pub fn resolve(input: &str) -> FaceState {
    if input.is_empty() {
        return FaceState::default();
    }

    if let Some(stem) = png_stem(input) {
        return resolve_stem(stem).unwrap_or_default();
    }

    if let Some(state) = FaceState::from_name(input) {
        return state;
    }

    LEGACY_TOKENS
        .iter()
        .find(|(token, _)| *token == input)
        .map(|(_, state)| *state)
        .unwrap_or_default()
}

/// Name part before the first `.png`/`.PNG` anywhere in `input`, so
/// `HAPPY.png.bak` still names HAPPY.
fn png_stem(input: &str) -> Option<&str> {
    let ext = input.find(".png").or_else(|| input.find(".PNG"))?;
    let start = input[..ext].rfind('/').map(|slash| slash + 1).unwrap_or(0);
    Some(&input[start..ext])
}

fn resolve_stem(stem: &str) -> Option<FaceState> {
    if stem.is_empty() || stem.len() > MAX_NAME_LEN {
        return None;
    }
    let mut upper = heapless::String::<MAX_NAME_LEN>::new();
    upper.push_str(stem).ok()?;
    upper.make_ascii_uppercase();
    FaceState::iter().find(|state| state.name() == upper.as_str())
}
