//! Keyframe channel sampling (translation / rotation / scale)

use glam::{Quat, Vec3, Vec4};

/// Keyframe interpolation mode
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub(crate) enum Interpolation {
    Step,
    Linear,
    /// Each key stores `[in_tangent, value, out_tangent]`
    CubicSpline,
}

impl From<gltf::animation::Interpolation> for Interpolation {
    fn from(interpolation: gltf::animation::Interpolation) -> Self {
        match interpolation {
            gltf::animation::Interpolation::Step => Self::Step,
            gltf::animation::Interpolation::Linear => Self::Linear,
            gltf::animation::Interpolation::CubicSpline => Self::CubicSpline,
        }
    }
}

/// Values a channel can animate
pub(crate) trait Animatable: Copy {
    fn interpolate(a: Self, b: Self, t: f32) -> Self;

    /// Cubic Hermite between `p0` and `p1` with tangents scaled by key spacing `dt`
    fn hermite(p0: Self, m0: Self, p1: Self, m1: Self, t: f32, dt: f32) -> Self;
}

fn hermite_weights(t: f32) -> [f32; 4] {
    let t2 = t * t;
    let t3 = t2 * t;
    [
        2.0 * t3 - 3.0 * t2 + 1.0,
        t3 - 2.0 * t2 + t,
        -2.0 * t3 + 3.0 * t2,
        t3 - t2,
    ]
}

impl Animatable for Vec3 {
    fn interpolate(a: Self, b: Self, t: f32) -> Self {
        a.lerp(b, t)
    }

    fn hermite(p0: Self, m0: Self, p1: Self, m1: Self, t: f32, dt: f32) -> Self {
        let [h00, h10, h01, h11] = hermite_weights(t);
        p0 * h00 + m0 * (h10 * dt) + p1 * h01 + m1 * (h11 * dt)
    }
}

impl Animatable for Quat {
    fn interpolate(a: Self, b: Self, t: f32) -> Self {
        a.slerp(b, t)
    }

    fn hermite(p0: Self, m0: Self, p1: Self, m1: Self, t: f32, dt: f32) -> Self {
        let [h00, h10, h01, h11] = hermite_weights(t);
        let v = Vec4::from(p0) * h00
            + Vec4::from(m0) * (h10 * dt)
            + Vec4::from(p1) * h01
            + Vec4::from(m1) * (h11 * dt);
        let len = v.length();
        if len > 0.0 && len.is_finite() {
            Quat::from_vec4(v / len)
        } else {
            p0
        }
    }
}

/// Sampled keyframes of one property
#[derive(Debug, Clone)]
pub(crate) struct Keyframes<T> {
    times: Vec<f32>,
    values: Vec<T>,
    interpolation: Interpolation,
}

impl<T: Animatable> Keyframes<T> {
    /// Returns `None` when the value count does not match the key count, or
    /// when key times are not finite and non-decreasing
    pub(crate) fn new(times: Vec<f32>, values: Vec<T>, interpolation: Interpolation) -> Option<Self> {
        let expected = match interpolation {
            Interpolation::CubicSpline => times.len() * 3,
            _ => times.len(),
        };
        if times.is_empty() || values.len() < expected {
            return None;
        }
        if times.iter().any(|t| !t.is_finite()) || times.windows(2).any(|w| w[1] < w[0]) {
            return None;
        }
        Some(Self {
            times,
            values,
            interpolation,
        })
    }

    fn key(&self, i: usize) -> T {
        match self.interpolation {
            Interpolation::CubicSpline => self.values[i * 3 + 1],
            _ => self.values[i],
        }
    }

    /// Value at `t` seconds, clamped to the first/last key outside the keyed range
    pub(crate) fn sample(&self, t: f32) -> T {
        let last = self.times.len() - 1;
        if last == 0 || t.is_nan() || t <= self.times[0] {
            return self.key(0);
        }
        if t >= self.times[last] {
            return self.key(last);
        }

        // times[i] <= t < times[i + 1]
        let i = self.times.partition_point(|&k| k <= t).saturating_sub(1).min(last - 1);
        let t0 = self.times[i];
        let t1 = self.times[i + 1];
        let dt = t1 - t0;
        let factor = if dt > 0.0 { ((t - t0) / dt).clamp(0.0, 1.0) } else { 0.0 };

        match self.interpolation {
            Interpolation::Step => self.key(i),
            Interpolation::Linear => T::interpolate(self.key(i), self.key(i + 1), factor),
            Interpolation::CubicSpline => {
                let out_tangent = self.values[i * 3 + 2];
                let in_tangent = self.values[(i + 1) * 3];
                T::hermite(self.key(i), out_tangent, self.key(i + 1), in_tangent, factor, dt)
            }
        }
    }

    /// First and last key times
    pub(crate) fn time_range(&self) -> (f32, f32) {
        (self.times[0], self.times[self.times.len() - 1])
    }
}
