use crate::app_state::State;
use crate::config::BoardConfig;
use std::sync::Arc;
use winit::{
    application::ApplicationHandler,
    event::*,
    event_loop::{ActiveEventLoop, EventLoop},
    keyboard::{KeyCode, PhysicalKey},
    window::{Window, WindowId},
};

#[cfg(target_os = "macos")]
use winit::platform::macos::WindowAttributesExtMacOS;

#[cfg(target_arch = "wasm32")]
use wasm_bindgen::{prelude::*, JsCast};

struct App {
    state: Option<State>,
    config: BoardConfig,
}

impl ApplicationHandler for App {
    fn resumed(&mut self, event_loop: &ActiveEventLoop) {
        if self.state.is_some() {
            return;
        }

        let mut window_attributes = Window::default_attributes()
            .with_title("Tactical Board")
            .with_inner_size(winit::dpi::LogicalSize::new(1100.0, 760.0));

        #[cfg(target_os = "macos")]
        {
            window_attributes = window_attributes
                .with_titlebar_transparent(true)
                .with_title_hidden(false);
        }

        let window = match event_loop.create_window(window_attributes) {
            Ok(window) => window,
            Err(e) => {
                log::error!("failed to create window: {e}");
                event_loop.exit();
                return;
            }
        };

        #[cfg(target_arch = "wasm32")]
        attach_canvas(&window);

        let window = Arc::new(window);
        match pollster::block_on(State::new(window, self.config.clone())) {
            Ok(state) => self.state = Some(state),
            Err(e) => {
                log::error!("failed to initialise graphics: {e:#}");
                event_loop.exit();
            }
        }
    }

    fn window_event(&mut self, event_loop: &ActiveEventLoop, window_id: WindowId, event: WindowEvent) {
        let Some(state) = &mut self.state else {
            return;
        };
        if window_id != state.window().id() || state.input(&event) {
            return;
        }

        match event {
            WindowEvent::CloseRequested
            | WindowEvent::KeyboardInput {
                event:
                    KeyEvent {
                        state: ElementState::Pressed,
                        physical_key: PhysicalKey::Code(KeyCode::Escape),
                        ..
                    },
                ..
            } => event_loop.exit(),
            WindowEvent::Resized(physical_size) => {
                log::info!("WindowEvent::Resized: {}x{}", physical_size.width, physical_size.height);
                state.resize(physical_size);
            }
            WindowEvent::RedrawRequested => {
                state.update();
                match state.render() {
                    Ok(_) => {}
                    Err(wgpu::SurfaceError::Lost | wgpu::SurfaceError::Outdated) => {
                        state.resize(state.size)
                    }
                    Err(wgpu::SurfaceError::OutOfMemory) => {
                        log::error!("out of GPU memory");
                        event_loop.exit()
                    }
                    Err(e) => log::warn!("dropped frame: {e:?}"),
                }
            }
            _ => {}
        }
    }

    fn about_to_wait(&mut self, _event_loop: &ActiveEventLoop) {
        if let Some(state) = &self.state {
            state.window().request_redraw();
        }
    }
}

/// Puts the winit canvas into the page and keeps it at full viewport size.
#[cfg(target_arch = "wasm32")]
fn attach_canvas(window: &Window) {
    use winit::dpi::PhysicalSize;
    use winit::platform::web::WindowExtWebSys;

    let Some(canvas) = window.canvas() else {
        log::error!("window has no canvas");
        return;
    };
    let Some(web_window) = web_sys::window() else {
        return;
    };

    let element = web_sys::Element::from(canvas.clone());
    let attached = web_window
        .document()
        .and_then(|doc| {
            let dst = doc
                .get_element_by_id("tactical-board")
                .or_else(|| doc.body().map(web_sys::Element::from))?;
            dst.append_child(&element).ok()
        })
        .is_some();
    if !attached {
        log::error!("could not attach canvas to the document");
    }

    let update_canvas_size = {
        let canvas = canvas.clone();
        move || -> Option<(u32, u32)> {
            let web_window = web_sys::window()?;
            let device_pixel_ratio = web_window.device_pixel_ratio();
            let css_width = web_window.inner_width().ok()?.as_f64()?;
            let css_height = web_window.inner_height().ok()?.as_f64()?;

            let width = (css_width * device_pixel_ratio) as u32;
            let height = (css_height * device_pixel_ratio) as u32;
            canvas.set_width(width);
            canvas.set_height(height);

            let style = canvas.style();
            let _ = style.set_property("display", "block");
            let _ = style.set_property("width", &format!("{}px", css_width as u32));
            let _ = style.set_property("height", &format!("{}px", css_height as u32));

            log::info!(
                "Canvas size updated to: {}x{} (CSS: {}x{}, DPR: {})",
                width, height, css_width as u32, css_height as u32, device_pixel_ratio
            );
            Some((width, height))
        }
    };

    if let Some((width, height)) = update_canvas_size() {
        let _ = window.request_inner_size(PhysicalSize::new(width, height));
    }

    let resize_closure = Closure::wrap(Box::new(move || {
        update_canvas_size();
    }) as Box<dyn FnMut()>);
    if web_window
        .add_event_listener_with_callback("resize", resize_closure.as_ref().unchecked_ref())
        .is_err()
    {
        log::warn!("could not listen for page resizes");
    }
    resize_closure.forget();
}

pub async fn run() {
    cfg_if::cfg_if! {
        if #[cfg(target_arch = "wasm32")] {
            std::panic::set_hook(Box::new(console_error_panic_hook::hook));
            if let Err(e) = console_log::init_with_level(log::Level::Info) {
                web_sys::console::error_1(&format!("couldn't initialise logger: {e}").into());
            }
        } else {
            env_logger::init();
        }
    }

    let config = BoardConfig::load();

    let event_loop = match EventLoop::new() {
        Ok(event_loop) => event_loop,
        Err(e) => {
            log::error!("failed to create event loop: {e}");
            return;
        }
    };
    let mut app = App {
        state: None,
        config,
    };

    if let Err(e) = event_loop.run_app(&mut app) {
        log::error!("event loop terminated: {e}");
    }
}
