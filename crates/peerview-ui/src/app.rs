//! Composition root.
//!
//! Mounts the desktop frame and the content screen as two runtimes that share
//! only the bus and the backend, then attaches the bus. Anything either side
//! dispatches before that point is dropped, so attaching is the last step of
//! construction.

use std::rc::Rc;
use std::time::Duration;

use peerview_core::backend::Backend;
use peerview_core::bus::EventBus;
use peerview_core::config::Config;
use peerview_core::runtime::{Outbox, Runtime, Scheduler, Task};
use peerview_core::view::View;
use tokio_util::sync::CancellationToken;
use tracing::{debug, info};

use crate::screens::content::{self, ContentScreen};
use crate::screens::desktop_frame::{self, DesktopFrame, FrameOptions};

pub struct App {
    bus: EventBus,
    frame: Runtime<DesktopFrame>,
    content: Runtime<ContentScreen>,
    scheduler: Scheduler,
    idle_poll: Duration,
}

impl App {
    pub fn new(config: &Config, backend: Rc<dyn Backend>) -> Self {
        let bus = EventBus::new();
        let frame = Runtime::mount(
            DesktopFrame::new(FrameOptions::from(&config.app)),
            &bus,
            Rc::clone(&backend),
        );
        let content = Runtime::mount(ContentScreen::new(), &bus, backend);
        bus.attach();
        info!(
            subscribers = bus.subscriber_count(),
            max_rounds = config.runtime.max_rounds,
            "app mounted"
        );

        Self {
            bus,
            frame,
            content,
            scheduler: Scheduler::new(config.runtime.max_rounds),
            idle_poll: config.runtime.idle_poll(),
        }
    }

    pub fn bus(&self) -> &EventBus {
        &self.bus
    }

    pub fn press_frame(&self, gesture: desktop_frame::Gesture) {
        self.frame.send(gesture);
    }

    pub fn press_content(&self, gesture: content::Gesture) {
        self.content.send(gesture);
    }

    /// Drives both runtimes until neither has work. Returns steps processed.
    pub fn run_until_idle(&mut self) -> usize {
        let frame: &mut dyn Task = &mut self.frame;
        let content: &mut dyn Task = &mut self.content;
        self.scheduler.run_until_idle(&mut [frame, content])
    }

    /// Host loop: settle, then sleep until the next poll.
    ///
    /// Returns when `cancel` fires or a screen asked to exit.
    pub async fn run(&mut self, cancel: CancellationToken) {
        loop {
            let steps = self.run_until_idle();
            if steps > 0 {
                debug!(steps, "settled");
            }
            if self.exit_requested() {
                info!("exit requested; stopping");
                return;
            }
            tokio::select! {
                () = cancel.cancelled() => {
                    info!("cancelled; stopping");
                    return;
                }
                () = tokio::time::sleep(self.idle_poll) => {}
            }
        }
    }

    /// Drains navigation commands and links, frame first.
    pub fn take_outbox(&mut self) -> Outbox {
        let mut outbox = self.frame.take_outbox();
        outbox.append(self.content.take_outbox());
        outbox
    }

    pub fn exit_requested(&self) -> bool {
        self.frame.exit_requested() || self.content.exit_requested()
    }

    pub fn frame_state(&self) -> Option<&desktop_frame::State> {
        self.frame.state()
    }

    pub fn content_state(&self) -> Option<&content::State> {
        self.content.state()
    }

    /// The frame with the content screen in its content slot.
    pub fn render(&self) -> View {
        self.frame
            .render()
            .child(View::new("content-slot").child(self.content.render()))
    }
}

#[cfg(test)]
mod tests {
    use peerview_core::backend::ChannelBackend;
    use peerview_core::events::{ContentTab, GlobalEvent};

    use super::*;

    fn app() -> App {
        App::new(&Config::default(), Rc::new(ChannelBackend::new()))
    }

    #[test]
    fn test_render_before_settle_is_placeholder() {
        let app = app();
        let view = app.render();
        assert_eq!(view.tag, View::placeholder().tag);
        assert!(view.find("content-slot").is_some());
    }

    #[test]
    fn test_settle_initializes_both_runtimes() {
        let mut app = app();
        app.run_until_idle();
        assert_eq!(app.frame_state().unwrap().current_tab, ContentTab::Home);
        assert_eq!(app.content_state().unwrap().current_tab, ContentTab::Home);
        assert!(app.render().find("content-screen").is_some());
    }

    #[tokio::test]
    async fn test_run_stops_on_cancel() {
        let mut app = app();
        let cancel = CancellationToken::new();
        cancel.cancel();
        app.run(cancel).await;
        assert!(app.frame_state().is_some());
        assert!(!app.exit_requested());
    }

    #[tokio::test]
    async fn test_run_stops_on_exit() {
        let mut app = app();
        app.run_until_idle();
        app.bus().dispatch(GlobalEvent::HardwareBackOnContentScreen);
        app.run(CancellationToken::new()).await;
        assert!(app.exit_requested());
    }
}
