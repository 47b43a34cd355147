use crate::synth::error::SynthError;

#[derive(Debug, Clone, Copy, PartialEq)]
pub enum AutomationEvent {
    SetValue { value: f32, time: f64 },
    LinearRamp { value: f32, time: f64 },
    ExponentialRamp { value: f32, time: f64 },
}

impl AutomationEvent {
    pub fn time(&self) -> f64 {
        match *self {
            AutomationEvent::SetValue { time, .. }
            | AutomationEvent::LinearRamp { time, .. }
            | AutomationEvent::ExponentialRamp { time, .. } => time,
        }
    }

    pub fn value(&self) -> f32 {
        match *self {
            AutomationEvent::SetValue { value, .. }
            | AutomationEvent::LinearRamp { value, .. }
            | AutomationEvent::ExponentialRamp { value, .. } => value,
        }
    }
}

/// Timeline of scheduled parameter changes, evaluated the way Web Audio's
/// `AudioParam` evaluates them.
///
/// A ramp interpolates from the end point of the previous event (or from the
/// default value at the timeline's origin) to its own value and time.
#[derive(Debug, Clone)]
pub struct Automation {
    default_value: f32,
    origin: f64,
    events: Vec<AutomationEvent>,
}

impl Automation {
    pub fn new(default_value: f32, origin: f64) -> Self {
        Self {
            default_value,
            origin,
            events: Vec::new(),
        }
    }

    pub fn events(&self) -> &[AutomationEvent] {
        &self.events
    }

    pub fn set_value_at_time(&mut self, value: f32, time: f64) -> Result<(), SynthError> {
        self.insert(AutomationEvent::SetValue { value, time })
    }

    pub fn linear_ramp_to_value_at_time(
        &mut self,
        value: f32,
        time: f64,
    ) -> Result<(), SynthError> {
        self.insert(AutomationEvent::LinearRamp { value, time })
    }

    pub fn exponential_ramp_to_value_at_time(
        &mut self,
        value: f32,
        time: f64,
    ) -> Result<(), SynthError> {
        if value == 0.0 {
            return Err(SynthError::InvalidAutomation { value, time });
        }
        self.insert(AutomationEvent::ExponentialRamp { value, time })
    }

    pub fn cancel_scheduled_values(&mut self, time: f64) {
        self.events.retain(|event| event.time() < time);
    }

    /// Drops events that can no longer influence values at or after `time`,
    /// keeping the last one as the new starting point.
    pub fn prune_before(&mut self, time: f64) {
        let past = self.events.partition_point(|event| event.time() <= time);
        if past > 0 {
            let last = self.events[past - 1];
            self.origin = last.time();
            self.default_value = last.value();
            self.events.drain(..past);
        }
    }

    pub fn value_at(&self, time: f64) -> f32 {
        let next = self.events.partition_point(|event| event.time() <= time);
        let (start_value, start_time) = if next == 0 {
            (self.default_value, self.origin)
        } else {
            let previous = &self.events[next - 1];
            (previous.value(), previous.time())
        };

        match self.events.get(next) {
            Some(&AutomationEvent::LinearRamp { value, time: end }) => {
                let progress = Self::progress(time, start_time, end);
                start_value + (value - start_value) * progress as f32
            }
            Some(&AutomationEvent::ExponentialRamp { value, time: end }) => {
                if start_value == 0.0 || (start_value < 0.0) != (value < 0.0) {
                    return start_value;
                }
                let progress = Self::progress(time, start_time, end);
                let ratio = f64::from(value) / f64::from(start_value);
                (f64::from(start_value) * ratio.powf(progress)) as f32
            }
            _ => start_value,
        }
    }

    fn progress(time: f64, start: f64, end: f64) -> f64 {
        if end <= start {
            1.0
        } else {
            ((time - start) / (end - start)).clamp(0.0, 1.0)
        }
    }

    fn insert(&mut self, event: AutomationEvent) -> Result<(), SynthError> {
        let (value, time) = (event.value(), event.time());
        if !value.is_finite() || !time.is_finite() || time < 0.0 {
            return Err(SynthError::InvalidAutomation { value, time });
        }
        let index = self.events.partition_point(|existing| existing.time() <= time);
        self.events.insert(index, event);
        Ok(())
    }
}
