use crate::face::FaceState;

pub const DEFAULT_INTERVAL_MS: u32 = 500;

#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, strum_macros::EnumIter)]
pub enum AnimationKind {
    #[default]
    None,
    /// Left and right, back and forth.
    Look,
    LookHappy,
    /// 1 2 3 4 3 2, repeating.
    Sleep,
    /// Binary counter on the eyes, counting up.
    Upload,
    /// Same frames counting down.
    Download,
}

const LOOK: &[FaceState] = &[FaceState::LookL, FaceState::LookR];
const LOOK_HAPPY: &[FaceState] = &[FaceState::LookLHappy, FaceState::LookRHappy];
const SLEEP: &[FaceState] = &[
    FaceState::Sleep1,
    FaceState::Sleep2,
    FaceState::Sleep3,
    FaceState::Sleep4,
    FaceState::Sleep3,
    FaceState::Sleep2,
];
const UPLOAD: &[FaceState] = &[
    FaceState::Upload00,
    FaceState::Upload01,
    FaceState::Upload10,
    FaceState::Upload11,
];
const DOWNLOAD: &[FaceState] = &[
    FaceState::Upload11,
    FaceState::Upload10,
    FaceState::Upload01,
    FaceState::Upload00,
];

impl AnimationKind {
    pub fn frames(self) -> &'static [FaceState] {
        match self {
            AnimationKind::None => &[],
            AnimationKind::Look => LOOK,
            AnimationKind::LookHappy => LOOK_HAPPY,
            AnimationKind::Sleep => SLEEP,
            AnimationKind::Upload => UPLOAD,
            AnimationKind::Download => DOWNLOAD,
        }
    }

    pub fn label(self) -> &'static str {
        match self {
            AnimationKind::None => "none",
            AnimationKind::Look => "look",
            AnimationKind::LookHappy => "look-happy",
            AnimationKind::Sleep => "sleep",
            AnimationKind::Upload => "upload",
            AnimationKind::Download => "download",
        }
    }
}

impl core::str::FromStr for AnimationKind {
    type Err = ();

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        use strum::IntoEnumIterator;
        AnimationKind::iter()
            .find(|kind| kind.label().eq_ignore_ascii_case(s))
            .ok_or(())
    }
}

/// The single running face animation.
///
/// Times are a free-running millisecond counter that may wrap.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct Animation {
    kind: AnimationKind,
    frame: usize,
    interval_ms: u32,
    last_tick: u32,
}

impl Default for Animation {
    fn default() -> Self {
        Self::new()
    }
}

impl Animation {
    pub const fn new() -> Self {
        Self {
            kind: AnimationKind::None,
            frame: 0,
            interval_ms: DEFAULT_INTERVAL_MS,
            last_tick: 0,
        }
    }

    /// Replaces whatever was running. Non-positive intervals use the default.
    pub fn start(&mut self, kind: AnimationKind, interval_ms: i32, now_ms: u32) {
        self.kind = kind;
        self.frame = 0;
        self.interval_ms = if interval_ms <= 0 {
            DEFAULT_INTERVAL_MS
        } else {
            interval_ms as u32
        };
        self.last_tick = now_ms;
        log::debug!("Animation {} started ({} ms)", kind.label(), self.interval_ms);
    }

    pub fn stop(&mut self) {
        self.kind = AnimationKind::None;
        self.frame = 0;
    }

    pub fn is_active(&self) -> bool {
        self.kind != AnimationKind::None
    }

    pub fn kind(&self) -> AnimationKind {
        self.kind
    }

    pub fn interval_ms(&self) -> u32 {
        self.interval_ms
    }

    /// Advances one frame once the interval has elapsed since the last advance.
    /// Returns whether the frame changed.
    pub fn tick(&mut self, now_ms: u32) -> bool {
        let frames = self.kind.frames();
        if frames.is_empty() || now_ms.wrapping_sub(self.last_tick) < self.interval_ms {
            return false;
        }
        self.frame = (self.frame + 1) % frames.len();
        self.last_tick = now_ms;
        true
    }

    /// Face for the current frame, `None` when nothing is running.
    pub fn current_frame(&self) -> Option<FaceState> {
        self.kind.frames().get(self.frame).copied()
    }
}
