use std::time::Instant;

use anyhow::{Context, Result};
use ouroboros::self_referencing;

use winit::application::ApplicationHandler;
use winit::dpi::LogicalSize;
use winit::event::WindowEvent;
use winit::event_loop::{ActiveEventLoop, ControlFlow, EventLoop};
use winit::window::{Window, WindowId};

use crate::coords::SurfaceSize;
use crate::core::{App as CoreApp, AppControl, FrameCtx};
use crate::device::{Gpu, GpuInit, SurfaceErrorAction};
use crate::render::{RenderCtx, RenderTarget, Renderer};
use crate::time::{FrameScheduler, FrameStats, LoopHooks, SchedulerConfig, SystemClock};

/// Window/runtime configuration.
#[derive(Debug, Clone)]
pub struct RuntimeConfig {
    pub title: String,
    pub initial_size: LogicalSize<f64>,
    /// Logical resolution handed to `App::init`.
    pub resolution: SurfaceSize,
    pub scheduler: SchedulerConfig,
}

impl Default for RuntimeConfig {
    fn default() -> Self {
        Self {
            title: "tessera".to_string(),
            initial_size: LogicalSize::new(864.0, 576.0),
            resolution: SurfaceSize::new(288, 192),
            scheduler: SchedulerConfig::default(),
        }
    }
}

/// Entry point for the runtime.
pub struct Runtime;

impl Runtime {
    pub fn run<A>(config: RuntimeConfig, gpu_init: GpuInit, app: A) -> Result<()>
    where
        A: 'static + CoreApp,
    {
        let event_loop = EventLoop::new().context("failed to create winit EventLoop")?;
        let mut state = AppState::new(config, gpu_init, app);

        event_loop
            .run_app(&mut state)
            .context("winit event loop terminated with error")?;

        Ok(())
    }
}

#[self_referencing]
struct WindowEntry {
    window: Window,

    #[borrows(window)]
    #[covariant]
    gpu: Gpu<'this>,
}

/// Everything that exists only once the window does.
struct Running {
    entry: WindowEntry,
    renderer: Renderer,
    scheduler: FrameScheduler,
}

struct AppState<A>
where
    A: CoreApp + 'static,
{
    config: RuntimeConfig,
    gpu_init: GpuInit,
    app: A,
    clock: SystemClock,

    running: Option<Running>,
    exit_requested: bool,
}

impl<A> AppState<A>
where
    A: CoreApp + 'static,
{
    fn new(config: RuntimeConfig, gpu_init: GpuInit, app: A) -> Self {
        Self {
            config,
            gpu_init,
            app,
            clock: SystemClock::new(),
            running: None,
            exit_requested: false,
        }
    }

    fn request_exit(&mut self, event_loop: &ActiveEventLoop) {
        self.exit_requested = true;
        event_loop.exit();
    }

    fn start(&mut self, event_loop: &ActiveEventLoop) -> Result<Running> {
        let attrs = Window::default_attributes()
            .with_title(self.config.title.clone())
            .with_inner_size(self.config.initial_size);

        let window = event_loop
            .create_window(attrs)
            .context("failed to create window")?;

        let gpu_init = self.gpu_init.clone();
        let entry = WindowEntryTryBuilder {
            window,
            gpu_builder: |w| pollster::block_on(Gpu::new(w, gpu_init)),
        }
        .try_build()
        .context("GPU initialization failed for window")?;

        let mut renderer = entry
            .with_gpu(|gpu| {
                Renderer::new(
                    RenderCtx::new(gpu.device(), gpu.queue()),
                    gpu.surface_format(),
                )
            })
            .context("failed to build shader programs")?;

        self.app
            .init(&mut renderer, self.config.resolution)
            .context("app initialization failed")?;

        let scheduler = FrameScheduler::new(self.config.scheduler, &self.clock);
        log::info!(
            "running at {} ticks/s, {} fps cap",
            self.config.scheduler.ticks_per_second,
            self.config.scheduler.max_fps
        );

        Ok(Running {
            entry,
            renderer,
            scheduler,
        })
    }
}

/// Scheduler callbacks bound to the app and the window's GPU for one step.
struct Driver<'a, 'w, A> {
    app: &'a mut A,
    window: &'a Window,
    gpu: &'a mut Gpu<'w>,
    renderer: &'a mut Renderer,
    stats: FrameStats,
    control: AppControl,
}

impl<A: CoreApp> LoopHooks for Driver<'_, '_, A> {
    fn tick(&mut self) {
        if self.control == AppControl::Continue && self.app.tick() == AppControl::Exit {
            self.control = AppControl::Exit;
        }
    }

    fn render(&mut self) {
        if self.control == AppControl::Exit {
            return;
        }

        let mut frame = match self.gpu.begin_frame() {
            Ok(f) => f,
            Err(err) => {
                if self.gpu.handle_surface_error(err) == SurfaceErrorAction::Fatal {
                    self.control = AppControl::Exit;
                }
                return;
            }
        };

        let mut recorder = self.renderer.begin_frame();
        let mut ctx = FrameCtx {
            recorder: &mut recorder,
            window_size: frame.size,
            stats: self.stats,
        };
        self.control = self.app.render(&mut ctx);

        // RenderTarget borrows frame.encoder; dropped before submit() takes frame.
        {
            let mut target = RenderTarget::new(
                &mut frame.encoder,
                &frame.view,
                self.gpu.surface_format(),
                frame.size,
            );
            self.renderer.encode(recorder, &mut target);
        }

        self.window.pre_present_notify();
        self.gpu.submit(frame);
    }

    fn in_play(&self) -> bool {
        self.app.in_play()
    }

    fn running(&self) -> bool {
        self.control == AppControl::Continue
    }
}

impl<A> ApplicationHandler for AppState<A>
where
    A: CoreApp + 'static,
{
    fn resumed(&mut self, event_loop: &ActiveEventLoop) {
        if self.running.is_some() {
            return;
        }

        match self.start(event_loop) {
            Ok(running) => self.running = Some(running),
            Err(e) => {
                log::error!("failed to start: {e:#}");
                self.request_exit(event_loop);
            }
        }
    }

    fn about_to_wait(&mut self, event_loop: &ActiveEventLoop) {
        if self.exit_requested {
            event_loop.exit();
            return;
        }

        // Split borrows to avoid `self` capture inside `ouroboros` closures.
        let (app, clock) = (&mut self.app, &self.clock);
        let Some(running) = self.running.as_mut() else {
            return;
        };

        if let Some(speed) = app.game_speed() {
            if speed != running.scheduler.config().game_speed {
                running.scheduler.set_game_speed(speed);
            }
        }

        let stats = running.scheduler.stats();
        let (scheduler, renderer) = (&mut running.scheduler, &mut running.renderer);
        let (report, control) = running.entry.with_mut(|fields| {
            let mut driver = Driver {
                app,
                window: fields.window,
                gpu: fields.gpu,
                renderer,
                stats,
                control: AppControl::Continue,
            };
            let report = scheduler.step(clock, &mut driver);
            (report, driver.control)
        });

        if control == AppControl::Exit {
            self.request_exit(event_loop);
            return;
        }

        event_loop.set_control_flow(match report.sleep {
            Some(wait) => ControlFlow::WaitUntil(Instant::now() + wait),
            None => ControlFlow::Poll,
        });
    }

    fn window_event(
        &mut self,
        event_loop: &ActiveEventLoop,
        _window_id: WindowId,
        event: WindowEvent,
    ) {
        if self.exit_requested {
            event_loop.exit();
            return;
        }

        if self.app.on_window_event(&event) == AppControl::Exit {
            self.request_exit(event_loop);
            return;
        }

        let Some(running) = self.running.as_mut() else {
            return;
        };

        match &event {
            WindowEvent::CloseRequested => {
                self.running = None;
                self.request_exit(event_loop);
            }

            WindowEvent::Resized(new_size) => {
                running.entry.with_gpu_mut(|gpu| gpu.resize(*new_size));
            }

            WindowEvent::ScaleFactorChanged { .. } => {
                let new_size = running.entry.with_window(|w| w.inner_size());
                running.entry.with_gpu_mut(|gpu| gpu.resize(new_size));
            }

            _ => {}
        }
    }
}
