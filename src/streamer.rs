//! Frame cadence control and the main streaming loop.
//!
//! Each cycle acquires one temperature frame, encodes it, writes the
//! framed message to the sink, and sleeps whatever is left of the frame
//! budget. If a cycle takes longer than its budget the loop proceeds
//! immediately to the next frame, trading rate accuracy for liveness.

use std::io::Write;
use std::sync::atomic::{AtomicBool, Ordering};
use std::thread;
use std::time::{Duration, Instant};

use log::{debug, info, warn};

use crate::camera::{ThermalCamera, PIXEL_COUNT};
use crate::encode::{self, FRAME_PAYLOAD_LEN};
use crate::error::Result;
use crate::rate::RefreshRate;
use crate::wire;

/// Extra budget per frame on top of the nominal period. Despite the
/// configured rate being ostensibly `fps` Hz, the device frequently does
/// not have the frame ready exactly on time; this offset absorbs that
/// readiness latency.
const FRAME_READY_OFFSET: Duration = Duration::from_micros(850);

/// How often the loop emits a frame-counter debug line.
const STATS_INTERVAL_FRAMES: u64 = 100;

/// Wall-clock budget for one frame at the given rate.
pub fn frame_period(rate: RefreshRate) -> Duration {
    rate.interval() + FRAME_READY_OFFSET
}

/// The acquisition/encode/output loop.
pub struct Streamer<W> {
    camera: Box<dyn ThermalCamera>,
    sink: W,
    rate: RefreshRate,
    frame_period: Duration,
    frames: u64,
}

impl<W: Write> Streamer<W> {
    pub fn new(camera: Box<dyn ThermalCamera>, sink: W, rate: RefreshRate) -> Self {
        Self {
            camera,
            sink,
            rate,
            frame_period: frame_period(rate),
            frames: 0,
        }
    }

    /// Frames written to the sink so far.
    pub fn frames_streamed(&self) -> u64 {
        self.frames
    }

    /// Configure the camera, then stream frames until `running` clears or
    /// a fatal camera/sink error occurs.
    pub fn run(&mut self, running: &AtomicBool) -> Result<()> {
        self.camera.configure(self.rate)?;
        info!(
            "streaming at {} fps, frame budget {} µs",
            self.rate.fps(),
            self.frame_period.as_micros()
        );

        let mut frame = [0f32; PIXEL_COUNT];
        let mut payload = [0u8; FRAME_PAYLOAD_LEN];

        while running.load(Ordering::Relaxed) {
            let cycle_start = Instant::now();

            let ambient = self.camera.next_frame(&mut frame)?;
            encode::frame_to_bytes(&frame, &mut payload);
            wire::write_frame(&mut self.sink, &payload)?;

            self.frames += 1;
            if self.frames % STATS_INTERVAL_FRAMES == 0 {
                debug!(
                    "streamed {} frames, ambient {:.2} °C",
                    self.frames, ambient
                );
            }

            let elapsed = cycle_start.elapsed();
            if elapsed < self.frame_period {
                thread::sleep(self.frame_period - elapsed);
            } else {
                warn!(
                    "frame cycle overrun: {} µs (budget {} µs)",
                    elapsed.as_micros(),
                    self.frame_period.as_micros()
                );
            }
        }

        info!("streaming stopped after {} frames", self.frames);
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use std::io;
    use std::time::Instant;

    use super::*;
    use crate::camera::MockCamera;
    use crate::error::Error;

    /// Sink recording message boundaries: `write_frame` flushes exactly
    /// once per message, so flush timestamps mark completed frames.
    struct RecordingSink {
        data: Vec<u8>,
        completed_at: Vec<Instant>,
    }

    impl RecordingSink {
        fn new() -> Self {
            Self {
                data: Vec::new(),
                completed_at: Vec::new(),
            }
        }
    }

    impl Write for RecordingSink {
        fn write(&mut self, buf: &[u8]) -> io::Result<usize> {
            self.data.extend_from_slice(buf);
            Ok(buf.len())
        }

        fn flush(&mut self) -> io::Result<()> {
            self.completed_at.push(Instant::now());
            Ok(())
        }
    }

    fn run_to_failure(camera: MockCamera, rate: RefreshRate) -> (Streamer<RecordingSink>, Error) {
        let mut streamer = Streamer::new(Box::new(camera), RecordingSink::new(), rate);
        let running = AtomicBool::new(true);
        let err = streamer.run(&running).unwrap_err();
        (streamer, err)
    }

    #[test]
    fn frame_period_includes_readiness_offset() {
        for fps in [1u32, 2, 4, 8, 16, 32, 64] {
            let rate = RefreshRate::from_fps(fps).unwrap();
            assert_eq!(
                frame_period(rate).as_micros(),
                1_000_000 / u128::from(fps) + 850
            );
        }
    }

    #[test]
    fn cycle_writes_one_well_formed_message() {
        let (streamer, err) =
            run_to_failure(MockCamera::new().failing_after(1), RefreshRate::SixtyFour);
        assert!(matches!(err, Error::Camera(_)));
        assert_eq!(streamer.frames_streamed(), 1);

        let sink = &streamer.sink;
        assert_eq!(sink.data.len(), 2 + FRAME_PAYLOAD_LEN);
        assert_eq!(&sink.data[0..2], &[0x06, 0x00]);

        // Payload matches an independent encode of the mock's first frame.
        let mut camera = MockCamera::new();
        camera.configure(RefreshRate::SixtyFour).unwrap();
        let mut frame = [0f32; PIXEL_COUNT];
        camera.next_frame(&mut frame).unwrap();
        let mut expected = [0u8; FRAME_PAYLOAD_LEN];
        encode::frame_to_bytes(&frame, &mut expected);
        assert_eq!(&sink.data[2..], &expected[..]);
    }

    #[test]
    fn fast_cycles_are_paced_to_the_frame_period() {
        let period = frame_period(RefreshRate::SixtyFour);
        let started = Instant::now();
        let (streamer, _err) =
            run_to_failure(MockCamera::new().failing_after(4), RefreshRate::SixtyFour);
        let total = started.elapsed();

        assert_eq!(streamer.frames_streamed(), 4);
        // Four full cycles, each padded out to at least the frame budget.
        assert!(total >= 4 * period, "ran too fast: {:?}", total);

        let stamps = &streamer.sink.completed_at;
        assert_eq!(stamps.len(), 4);
        for pair in stamps.windows(2) {
            let gap = pair[1].duration_since(pair[0]);
            // The sleep is the dominant part of the gap; allow generous
            // scheduling slack above the period.
            assert!(
                gap >= period - Duration::from_millis(2),
                "gap {:?} shorter than period {:?}",
                gap,
                period
            );
            assert!(
                gap <= period + Duration::from_millis(250),
                "gap {:?} far above period {:?}",
                gap,
                period
            );
        }
    }

    #[test]
    fn slow_cycles_skip_the_sleep() {
        // Acquisition takes longer than the 16.475 ms budget at 64 fps, so
        // the loop must proceed immediately instead of sleeping (and must
        // not panic computing a negative remainder).
        let delay = Duration::from_millis(25);
        let started = Instant::now();
        let (streamer, _err) = run_to_failure(
            MockCamera::new()
                .with_acquisition_delay(delay)
                .failing_after(3),
            RefreshRate::SixtyFour,
        );
        let total = started.elapsed();

        assert_eq!(streamer.frames_streamed(), 3);
        assert!(total >= 3 * delay);
        // No frame-period sleeps were added on top of the slow cycles.
        assert!(
            total < 3 * delay + frame_period(RefreshRate::SixtyFour),
            "overrunning cycles slept anyway: {:?}",
            total
        );
    }

    #[test]
    fn camera_failure_aborts_the_run() {
        let (streamer, err) = run_to_failure(MockCamera::new().failing_after(0), RefreshRate::Two);
        assert!(matches!(err, Error::Camera(_)));
        assert_eq!(streamer.frames_streamed(), 0);
        assert!(streamer.sink.data.is_empty());
    }

    #[test]
    fn cleared_flag_stops_the_loop_without_error() {
        let mut streamer = Streamer::new(
            Box::new(MockCamera::new()),
            RecordingSink::new(),
            RefreshRate::Two,
        );
        let running = AtomicBool::new(false);
        streamer.run(&running).unwrap();
        assert_eq!(streamer.frames_streamed(), 0);
    }
}
