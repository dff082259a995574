//! Busy frame loop that runs until a quit event arrives

use crate::error::LessonError;
use crate::foundation::time::Timer;
use crate::platform::Platform;
use crate::render::backend::Backend;

/// Summary of a finished event loop
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct FrameStats {
    /// Frames drawn, including the one drawn after the quit event
    pub frames: u64,
    /// Wall time spent in the loop in seconds
    pub seconds: f32,
    /// Average frames per second
    pub average_fps: f32,
}

/// Drain events and draw one frame per iteration until quit is requested.
///
/// Every iteration first consumes all pending events, then calls
/// `draw_frame` exactly once whether or not any event arrived. The only
/// pacing is whatever `present` does (vsync on the GPU backend). The
/// iteration that sees the quit event still draws its frame.
pub fn run_until_quit<B, F>(platform: &Platform<B>, mut draw_frame: F) -> Result<FrameStats, LessonError>
where
    B: Backend,
    F: FnMut() -> Result<(), LessonError>,
{
    let mut timer = Timer::new();
    let mut events = Vec::new();
    let mut quit = false;

    log::info!("Entering event loop");

    while !quit {
        platform.poll_events(&mut events);
        for event in events.drain(..) {
            if event.is_quit() {
                log::debug!("Quit requested by {:?}", event);
                quit = true;
            } else {
                log::trace!("Ignoring {:?}", event);
            }
        }

        draw_frame()?;
        timer.update();
    }

    let stats = FrameStats {
        frames: timer.frame_count(),
        seconds: timer.total_time(),
        average_fps: timer.average_fps(),
    };
    log::info!(
        "Left event loop after {} frames in {:.2}s ({:.1} fps)",
        stats.frames,
        stats.seconds,
        stats.average_fps
    );

    Ok(stats)
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::events::{Event, KeyCode, MouseButton};
    use crate::render::headless::HeadlessBackend;

    fn frames_until_quit(batches: Vec<Vec<Event>>) -> u64 {
        let platform = Platform::from_backend(HeadlessBackend::new().with_event_batches(batches));
        let mut drawn = 0;
        let stats = run_until_quit(&platform, || {
            drawn += 1;
            Ok(())
        })
        .unwrap();
        assert_eq!(stats.frames, drawn);
        drawn
    }

    #[test]
    fn test_close_ends_loop_after_its_frame() {
        assert_eq!(frames_until_quit(vec![vec![Event::Quit]]), 1);
    }

    #[test]
    fn test_frames_drawn_without_events() {
        let batches = vec![
            vec![],
            vec![],
            vec![Event::KeyDown { key: KeyCode::Space, repeat: false }],
        ];
        assert_eq!(frames_until_quit(batches), 3);
    }

    #[test]
    fn test_ignored_events_keep_loop_running() {
        let batches = vec![
            vec![Event::WindowResized { width: 1024, height: 768 }, Event::FocusLost],
            vec![Event::MouseMotion { x: 3.0, y: 4.0 }, Event::KeyUp { key: KeyCode::Enter }],
            vec![Event::MouseButtonUp { button: MouseButton::Left }],
            vec![Event::MouseButtonDown { button: MouseButton::Left, x: 0.0, y: 0.0 }],
        ];
        assert_eq!(frames_until_quit(batches), 4);
    }

    #[test]
    fn test_whole_batch_drained_in_one_iteration() {
        let batches = vec![vec![
            Event::FocusGained,
            Event::Quit,
            Event::KeyDown { key: KeyCode::Escape, repeat: false },
        ]];
        assert_eq!(frames_until_quit(batches), 1);
    }

    #[test]
    fn test_draw_error_stops_loop() {
        let platform = Platform::from_backend(HeadlessBackend::new());
        let result = run_until_quit(&platform, || {
            Err(LessonError::Render(crate::render::backend::BackendError::NoRenderer))
        });
        assert!(matches!(result, Err(LessonError::Render(_))));
    }
}
