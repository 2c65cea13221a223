//! Tilt computation for the holographic card effect.
//!
//! Device-orientation or pointer samples are turned into a two-axis tilt in
//! degrees, clamped to ±45. The tilt drives a 3D rotation and a specular
//! gradient whose angle and offset are linear in the tilt.

use serde::Serialize;

use crate::config;

/// One raw input sample.
#[derive(Debug, Clone, Copy, PartialEq)]
pub enum TiltSample {
    /// Device orientation. `gamma` is left-to-right, `beta` front-to-back;
    /// either may be unavailable on some devices.
    Orientation { gamma: Option<f64>, beta: Option<f64> },
    /// Pointer position within a viewport of the given size.
    Pointer {
        x: f64,
        y: f64,
        width: f64,
        height: f64,
    },
}

/// What the platform can provide.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct InputCapabilities {
    pub orientation: bool,
    pub touch: bool,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum InputMode {
    Orientation,
    Pointer,
}

impl InputMode {
    /// Orientation when the platform exposes it and is touch-capable,
    /// pointer otherwise.
    pub fn select(caps: InputCapabilities) -> Self {
        if caps.orientation && caps.touch {
            InputMode::Orientation
        } else {
            InputMode::Pointer
        }
    }

    /// Whether a sample comes from this source.
    pub fn accepts(self, sample: &TiltSample) -> bool {
        matches!(
            (self, sample),
            (InputMode::Orientation, TiltSample::Orientation { .. })
                | (InputMode::Pointer, TiltSample::Pointer { .. })
        )
    }
}

fn clamp_axis(v: f64) -> f64 {
    if v.is_nan() {
        0.0
    } else {
        v.clamp(-config::TILT_LIMIT, config::TILT_LIMIT)
    }
}

#[derive(Debug, Clone, Copy, Default, PartialEq, Serialize)]
pub struct Tilt {
    pub x: f64,
    pub y: f64,
}

/// Specular highlight parameters derived from a tilt.
#[derive(Debug, Clone, Copy, PartialEq, Serialize)]
pub struct Shine {
    /// Gradient angle in degrees.
    pub angle: f64,
    /// Background position in percent.
    pub pos_x: f64,
    pub pos_y: f64,
}

impl Shine {
    pub fn background(&self) -> String {
        format!(
            "linear-gradient({}deg, rgba(255,255,255,0) 0%, rgba(255,255,255,0.1) 30%, \
             rgba(255,255,255,0.4) 50%, rgba(255,255,255,0.1) 70%, rgba(255,255,255,0) 100%)",
            self.angle
        )
    }

    pub fn background_position(&self) -> String {
        format!("{}% {}%", self.pos_x, self.pos_y)
    }
}

impl Tilt {
    pub const FLAT: Tilt = Tilt { x: 0.0, y: 0.0 };

    pub fn new(x: f64, y: f64) -> Self {
        Self {
            x: clamp_axis(x),
            y: clamp_axis(y),
        }
    }

    /// Compute a tilt from a sample. Pointer samples map the viewport onto
    /// `[-span/2, span/2]`. Returns `None` for samples that carry no usable
    /// reading (missing orientation axes, zero-sized viewport).
    pub fn from_sample(sample: TiltSample, pointer_span: f64) -> Option<Self> {
        match sample {
            TiltSample::Orientation {
                gamma: Some(gamma),
                beta: Some(beta),
            } => Some(Tilt::new(gamma, beta)),
            TiltSample::Orientation { .. } => None,
            TiltSample::Pointer {
                x,
                y,
                width,
                height,
            } => {
                if width <= 0.0 || height <= 0.0 {
                    return None;
                }
                Some(Tilt::new(
                    (x / width - 0.5) * pointer_span,
                    (y / height - 0.5) * pointer_span,
                ))
            }
        }
    }

    pub fn transform(&self) -> String {
        format!(
            "perspective(1000px) rotateY({}deg) rotateX({}deg)",
            self.x, -self.y
        )
    }

    pub fn shine(&self) -> Shine {
        Shine {
            angle: 135.0 + self.x,
            pos_x: 50.0 + self.x * 2.0,
            pos_y: 50.0 + self.y * 2.0,
        }
    }
}

// ---------------------------------------------------------------------------
// Sampling subscriptions
// ---------------------------------------------------------------------------

/// Identifier handed out by a [`SensorHub`] for one listener registration.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub struct ListenerId(pub u64);

/// Platform event source for tilt input.
pub trait SensorHub {
    fn capabilities(&self) -> InputCapabilities;
    fn subscribe(&mut self, mode: InputMode) -> ListenerId;
    fn unsubscribe(&mut self, id: ListenerId);
}

/// Scoped registration of a tilt listener; unsubscribes when dropped.
pub struct TiltSubscription<'h, H: SensorHub + ?Sized> {
    hub: &'h mut H,
    id: Option<ListenerId>,
    mode: InputMode,
    pointer_span: f64,
    tilt: Tilt,
}

impl<'h, H: SensorHub + ?Sized> TiltSubscription<'h, H> {
    pub fn acquire(hub: &'h mut H, pointer_span: f64) -> Self {
        let mode = InputMode::select(hub.capabilities());
        let id = hub.subscribe(mode);
        tracing::debug!(?mode, "tilt sampling started");
        Self {
            hub,
            id: Some(id),
            mode,
            pointer_span,
            tilt: Tilt::FLAT,
        }
    }

    pub fn mode(&self) -> InputMode {
        self.mode
    }

    pub fn tilt(&self) -> Tilt {
        self.tilt
    }

    /// Feed one sample. Samples from the non-selected source are ignored.
    pub fn sample(&mut self, sample: TiltSample) -> Tilt {
        if self.mode.accepts(&sample) {
            if let Some(t) = Tilt::from_sample(sample, self.pointer_span) {
                self.tilt = t;
            }
        }
        self.tilt
    }

    pub fn release(mut self) {
        self.unsubscribe();
    }

    fn unsubscribe(&mut self) {
        if let Some(id) = self.id.take() {
            self.hub.unsubscribe(id);
            tracing::debug!("tilt sampling stopped");
        }
    }
}

impl<H: SensorHub + ?Sized> Drop for TiltSubscription<'_, H> {
    fn drop(&mut self) {
        self.unsubscribe();
    }
}
