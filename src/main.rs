use std::error::Error;
use std::path::Path;
use std::sync::atomic::{AtomicBool, Ordering};
use std::sync::mpsc;
use std::sync::Arc;
use std::time::{Duration, Instant};

use dyetank::config::{self, Config};
use dyetank::input::{Injection, PointerStroke, SpringSource};
use dyetank::renderer::{self, RenderConfig};
use dyetank::solver::{self, diagnostics, SolverParams};
use dyetank::state::{FluidState, FrameSnapshot};
use minifb::{Key, MouseButton, MouseMode, Window, WindowOptions};

struct Defaults;

impl Defaults {
    const HEADLESS_STEPS: usize = 600;
    const HEADLESS_LOG_EVERY: usize = 60;
    const SPRING_SEED: u32 = 42;
}

/// Command-line options. Everything else comes from `dyetank.yaml`.
struct Args {
    headless: bool,
    steps: usize,
    config: Option<String>,
}

fn parse_args(args: &[String]) -> Result<Args, String> {
    let mut out = Args { headless: false, steps: Defaults::HEADLESS_STEPS, config: None };
    let mut it = args.iter().skip(1);
    while let Some(arg) = it.next() {
        match arg.as_str() {
            "--headless" => out.headless = true,
            "--steps" => {
                let v = it.next().ok_or("--steps needs a value")?;
                out.steps = v.parse().map_err(|e| format!("--steps {v}: {e}"))?;
            }
            "--config" => {
                out.config = Some(it.next().ok_or("--config needs a path")?.clone());
            }
            other => return Err(format!("unknown argument: {other}")),
        }
    }
    Ok(out)
}

fn load_config(path: Option<&str>) -> Result<Config, Box<dyn Error>> {
    match path {
        Some(p) => Ok(config::load_from(Path::new(p))?),
        None => Ok(config::load()),
    }
}

fn main() {
    env_logger::init();

    let argv: Vec<String> = std::env::args().collect();
    let args = match parse_args(&argv) {
        Ok(a) => a,
        Err(e) => {
            log::error!("{e}");
            eprintln!("usage: dyetank [--headless] [--steps N] [--config PATH]");
            std::process::exit(2);
        }
    };

    let result = load_config(args.config.as_deref()).and_then(|cfg| {
        log::info!(
            "grid={}x{} diffusion={} viscosity={} dt={:.5} sweeps={}/{}",
            cfg.physics.size, cfg.physics.size, cfg.physics.diffusion, cfg.physics.viscosity,
            cfg.physics.dt, cfg.physics.diffuse_iter, cfg.physics.project_iter,
        );
        if args.headless {
            run_headless(&cfg, args.steps)
        } else {
            run_gui(&cfg)
        }
    });

    if let Err(e) = result {
        log::error!("{e}");
        std::process::exit(1);
    }
}

/// Run the spring source without a window, logging diagnostics.
fn run_headless(cfg: &Config, steps: usize) -> Result<(), Box<dyn Error>> {
    let params = cfg.physics.solver_params();
    let mut sim = FluidState::new(cfg.physics.size, cfg.physics.diffusion, cfg.physics.viscosity);
    let mut spring = SpringSource::new(cfg.physics.size, cfg.source.amount, cfg.source.jitter, Defaults::SPRING_SEED);
    let mut pending = Vec::new();

    let start = Instant::now();
    for step in 1..=steps {
        if cfg.source.enabled {
            spring.emit(&mut pending);
        }
        for inj in pending.drain(..) {
            inj.apply(&mut sim);
        }
        solver::fluid_step(&mut sim, &params);

        if step % Defaults::HEADLESS_LOG_EVERY == 0 || step == steps {
            let n = sim.size();
            log::info!(
                "step={} mass={:.3} peak={:.3} div={:.4e} KE={:.4e}",
                step,
                diagnostics::total_mass(sim.dye()),
                diagnostics::max_value(sim.dye()),
                diagnostics::divergence_l1(sim.vx(), sim.vy(), n),
                diagnostics::kinetic_energy(sim.vx(), sim.vy(), n),
            );
        }
    }
    log::info!("{} steps in {:.2?}", steps, start.elapsed());
    Ok(())
}

/// Channels connecting the main (render) thread to the physics thread.
struct PhysicsChannels {
    inject_tx: mpsc::Sender<Vec<Injection>>,
    snap_rx: mpsc::Receiver<FrameSnapshot>,
    snap_return_tx: mpsc::Sender<FrameSnapshot>,
}

/// Spawn the physics thread. It owns the `FluidState`; injections reach it
/// only through `inject_tx` and are applied between ticks.
fn spawn_physics_thread(
    mut sim: FluidState,
    params: SolverParams,
    steps_per_frame: usize,
    running: Arc<AtomicBool>,
) -> (PhysicsChannels, std::thread::JoinHandle<()>) {
    let (inject_tx, inject_rx) = mpsc::channel::<Vec<Injection>>();
    let (snap_tx, snap_rx) = mpsc::sync_channel::<FrameSnapshot>(1);
    let (snap_return_tx, snap_return_rx) = mpsc::channel::<FrameSnapshot>();

    let handle = std::thread::spawn(move || {
        let n = sim.size();
        let mut snap_buf = FrameSnapshot::new_empty(n);

        while running.load(Ordering::SeqCst) {
            while let Ok(batch) = inject_rx.try_recv() {
                for inj in &batch {
                    inj.apply(&mut sim);
                }
            }
            for _ in 0..steps_per_frame {
                solver::fluid_step(&mut sim, &params);
            }
            sim.snapshot_into(&mut snap_buf);
            if snap_tx.send(snap_buf).is_err() {
                break;
            }
            snap_buf = snap_return_rx
                .try_recv()
                .unwrap_or_else(|_| FrameSnapshot::new_empty(n));
        }
        log::debug!("physics thread stopped");
    });

    let channels = PhysicsChannels { inject_tx, snap_rx, snap_return_tx };
    (channels, handle)
}

fn run_gui(cfg: &Config) -> Result<(), Box<dyn Error>> {
    let n = cfg.physics.size;
    let render_cfg = RenderConfig::new(n, cfg.display.scale);
    let (w, h) = (render_cfg.frame_width, render_cfg.frame_height);

    let mut window = Window::new("dyetank", w, h, WindowOptions::default())?;
    window.set_target_fps(cfg.display.target_fps);

    // Ctrl+C handler
    let running = Arc::new(AtomicBool::new(true));
    let r = running.clone();
    ctrlc::set_handler(move || {
        r.store(false, Ordering::SeqCst);
    })?;

    let sim = FluidState::new(n, cfg.physics.diffusion, cfg.physics.viscosity);
    let (channels, physics_thread) = spawn_physics_thread(
        sim,
        cfg.physics.solver_params(),
        cfg.display.steps_per_frame,
        running.clone(),
    );
    let PhysicsChannels { inject_tx, snap_rx, snap_return_tx } = channels;

    let mut stroke = PointerStroke::new(cfg.pointer.dye, cfg.pointer.velocity_gain);
    let mut spring = SpringSource::new(n, cfg.source.amount, cfg.source.jitter, Defaults::SPRING_SEED);

    let mut framebuf = vec![0u32; w * h];
    let mut rgba_buf: Vec<u8> = Vec::new();
    let mut frame_count = 0u32;
    let mut last_fps_time = Instant::now();

    while window.is_open() && !window.is_key_down(Key::Escape) && running.load(Ordering::SeqCst) {
        // --- Input ---
        let mut batch = Vec::new();
        if let Some(pos) = window.get_mouse_pos(MouseMode::Discard) {
            stroke.sample(pos, window.get_mouse_down(MouseButton::Left), cfg.display.scale, &mut batch);
        }
        if cfg.source.enabled {
            spring.emit(&mut batch);
        }
        if !batch.is_empty() && inject_tx.send(batch).is_err() {
            log::warn!("physics thread is gone");
            break;
        }

        // --- Non-blocking: grab latest snapshot if available ---
        let mut snap = None;
        while let Ok(s) = snap_rx.try_recv() {
            if let Some(old) = snap.replace(s) {
                let _ = snap_return_tx.send(old);
            }
        }
        if let Some(s) = snap {
            renderer::render_into(&mut rgba_buf, &s, &render_cfg);
            renderer::rgba_to_argb(&rgba_buf, &mut framebuf);
            let _ = snap_return_tx.send(s);
        }

        window.update_with_buffer(&framebuf, w, h)?;

        frame_count += 1;
        let now = Instant::now();
        if now.duration_since(last_fps_time) >= Duration::from_secs(1) {
            log::debug!("{frame_count} fps");
            window.set_title(&format!("dyetank - {frame_count} fps"));
            frame_count = 0;
            last_fps_time = now;
        }
    }

    // Shutdown
    running.store(false, Ordering::SeqCst);
    drop(snap_rx);
    if physics_thread.join().is_err() {
        return Err("physics thread panicked".into());
    }
    Ok(())
}
