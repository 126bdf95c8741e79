use crate::app_state::State;
use crate::mesh::Mesh;
use crate::scene::board_mesh;
use crate::ui::{UiView, TOOLBAR_HEIGHT};
use std::time::Duration;
use wgpu::util::DeviceExt;

const STATUS_DURATION: Duration = Duration::from_secs(4);

impl State {
    pub fn update(&mut self) {
        if let Some(extraction) = self.lineup.poll() {
            self.board.merge_lineup(&extraction.records);
            self.set_status(format!(
                "Lineup: {} players ({})",
                extraction.records.len(),
                extraction.source.label()
            ));
        }

        if self
            .status
            .as_ref()
            .is_some_and(|status| status.shown_at.elapsed() > STATUS_DURATION)
        {
            self.status = None;
        }

        self.update_buffers();
    }

    pub fn update_buffers(&mut self) {
        let mesh = self.frame_mesh();

        if mesh.is_empty() {
            self.geometry.vertex = None;
            self.geometry.index = None;
            self.geometry.count = 0;
            return;
        }

        self.geometry.vertex = Some(self.gpu.device.create_buffer_init(
            &wgpu::util::BufferInitDescriptor {
                label: Some("Vertex Buffer"),
                contents: bytemuck::cast_slice(&mesh.vertices),
                usage: wgpu::BufferUsages::VERTEX,
            },
        ));

        self.geometry.index = Some(self.gpu.device.create_buffer_init(
            &wgpu::util::BufferInitDescriptor {
                label: Some("Index Buffer"),
                contents: bytemuck::cast_slice(&mesh.indices),
                usage: wgpu::BufferUsages::INDEX,
            },
        ));

        self.geometry.count = mesh.indices.len() as u32;
    }

    /// Board shifted below the toolbar, with the overlay drawn on top.
    fn frame_mesh(&self) -> Mesh {
        let font = self.font.as_ref();
        let mut mesh = board_mesh(&self.board, font);
        mesh.translate([0.0, TOOLBAR_HEIGHT]);

        let view = UiView {
            board: &self.board,
            lineup_progress: self.lineup.is_busy().then(|| self.lineup.progress()),
            status: self.status.as_ref().map(|status| status.text.as_str()),
        };
        let screen = [self.size.width as f32, self.size.height as f32];
        mesh.extend(&self.ui_renderer.build(&view, screen, font));
        mesh
    }
}
