use std::str::FromStr;

use anyhow::{bail, Context as _, Result};
use glam::Vec3;

use tessera_engine::camera::{Camera, CameraUniform};
use tessera_engine::core::App;
use tessera_engine::device::Context;
use tessera_engine::paint::Color;
use tessera_engine::pipeline::{BindGroupShape, PipelineBuilder, VertexLayout};
use tessera_engine::render::PassConfig;
use tessera_engine::resources::{BindResource, GeometryKey, TextureUpload, UniformBlock};
use tessera_engine::scene::shapes::{self, TexVertex, Vertex2, Vertex3};
use tessera_engine::scene::{AspectScale, Drawable, PipelineId, Scene, Transform};
use tessera_engine::schedule::{FrameTick, LoopMode};
use tessera_engine::shader::{EmbeddedShaders, ShaderLoader, ShaderProvider};

const INSTANCE_COUNT: u32 = 100;
const CHECKER_SIZE: u32 = 64;
const CHECKER_CELL: u32 = 8;

/// Cube placements for the cube scene: a large centre cube flanked by two
/// smaller ones.
fn cube_row() -> [Transform; 3] {
    [
        Transform::at(Vec3::new(-3.5, 0.0, 0.0)).with_scale(Vec3::splat(0.5)),
        Transform::at(Vec3::ZERO),
        Transform::at(Vec3::new(3.5, 0.0, 0.0)).with_scale(Vec3::new(0.5, 1.5, 0.5)),
    ]
}

/// Demo scenes selectable from the command line.
#[derive(Debug, Copy, Clone, Eq, PartialEq)]
pub enum Demo {
    Triangle,
    Fullscreen,
    Circle,
    Textured,
    Cube,
    Instanced,
}

impl Demo {
    pub const ALL: [Demo; 6] = [
        Demo::Triangle,
        Demo::Fullscreen,
        Demo::Circle,
        Demo::Textured,
        Demo::Cube,
        Demo::Instanced,
    ];

    pub fn name(self) -> &'static str {
        match self {
            Demo::Triangle => "triangle",
            Demo::Fullscreen => "fullscreen",
            Demo::Circle => "circle",
            Demo::Textured => "textured",
            Demo::Cube => "cube",
            Demo::Instanced => "instanced",
        }
    }
}

impl FromStr for Demo {
    type Err = anyhow::Error;

    fn from_str(s: &str) -> Result<Self> {
        Demo::ALL
            .into_iter()
            .find(|d| d.name().eq_ignore_ascii_case(s))
            .with_context(|| {
                let names: Vec<_> = Demo::ALL.iter().map(|d| d.name()).collect();
                format!("unknown scene `{s}` (expected one of: {})", names.join(", "))
            })
    }
}

fn shaders() -> EmbeddedShaders {
    EmbeddedShaders::new()
        .with("scaled.vert", include_str!("../shaders/scaled.vert.wgsl"))
        .with("fullscreen.vert", include_str!("../shaders/fullscreen.vert.wgsl"))
        .with("gradient.frag", include_str!("../shaders/gradient.frag.wgsl"))
        .with("textured.vert", include_str!("../shaders/textured.vert.wgsl"))
        .with("textured.frag", include_str!("../shaders/textured.frag.wgsl"))
        .with("cube.vert", include_str!("../shaders/cube.vert.wgsl"))
        .with("instanced.vert", include_str!("../shaders/instanced.vert.wgsl"))
        .with("color.frag", include_str!("../shaders/color.frag.wgsl"))
}

/// Packed RGBA8 checkerboard, `size` x `size` pixels.
pub fn checkerboard(size: u32, cell: u32) -> Vec<u8> {
    let mut pixels = Vec::with_capacity((size * size * 4) as usize);
    for y in 0..size {
        for x in 0..size {
            let light = ((x / cell) + (y / cell)) % 2 == 0;
            let v = if light { 230 } else { 40 };
            pixels.extend_from_slice(&[v, v, v, 255]);
        }
    }
    pixels
}

/// Camera position orbiting the origin, `t` seconds into the loop.
fn orbit(t: f32) -> Vec3 {
    let angle = t * 0.6;
    Vec3::new(10.0 * angle.cos(), 4.0, 10.0 * angle.sin())
}

/// Viewer application: builds one [`Demo`] scene.
pub struct Viewer {
    demo: Demo,
    shaders: EmbeddedShaders,
    camera: Option<(Camera, UniformBlock<CameraUniform>)>,
}

impl Viewer {
    pub fn new(demo: Demo) -> Self {
        Self {
            demo,
            shaders: shaders(),
            camera: None,
        }
    }

    fn pipeline(
        &self,
        ctx: &Context<'_>,
        scene: &mut Scene,
        builder: PipelineBuilder,
        vertex: &str,
        fragment: &str,
    ) -> Result<PipelineId> {
        let vs = self.shaders.source(vertex)?;
        let fs = self.shaders.source(fragment)?;
        let pair = ShaderLoader::load(ctx.device(), &vs, &fs)?;
        let pipeline = builder.build(ctx.device(), &pair, ctx.surface_format())?;
        Ok(scene.add_pipeline(pipeline))
    }

    /// Pooled 2D geometry drawn through `scaled.vert` with an aspect-corrected scale.
    fn scaled_shape(
        &self,
        ctx: &Context<'_>,
        scene: &mut Scene,
        label: &str,
        geometry: &tessera_engine::resources::Geometry,
        base_scale: f32,
    ) -> Result<()> {
        let resources = ctx.resources();
        let id = self.pipeline(
            ctx,
            scene,
            PipelineBuilder::new(label)
                .vertex_layout(Vertex2::layout())
                .bind_group(BindGroupShape::new().uniform(0, wgpu::ShaderStages::VERTEX)),
            "scaled.vert",
            "gradient.frag",
        )?;

        let key = GeometryKey(0);
        scene.upload_geometry(&resources, key, geometry)?;

        let scale = AspectScale::new(&resources, base_scale, [0.0, 0.0], &format!("{label} scale"))?;
        let pipeline = scene.pipeline(id).context("pipeline just registered")?;
        let bind_group = resources.create_bind_group(
            pipeline,
            0,
            &[(0, BindResource::Buffer(scale.buffer()))],
            &format!("{label} bind group"),
        )?;

        scene.push(Drawable::pooled(id, key).bind_group(bind_group).aspect_scale(scale))?;
        Ok(())
    }

    fn setup_fullscreen(&self, ctx: &Context<'_>, scene: &mut Scene) -> Result<()> {
        let id = self.pipeline(
            ctx,
            scene,
            PipelineBuilder::new("fullscreen"),
            "fullscreen.vert",
            "gradient.frag",
        )?;
        scene.push(Drawable::procedural(id, 3))?;
        Ok(())
    }

    fn setup_textured(&self, ctx: &Context<'_>, scene: &mut Scene) -> Result<()> {
        let resources = ctx.resources();
        let id = self.pipeline(
            ctx,
            scene,
            PipelineBuilder::new("textured")
                .vertex_layout(TexVertex::layout())
                .bind_group(BindGroupShape::new().uniform(0, wgpu::ShaderStages::VERTEX))
                .bind_group(
                    BindGroupShape::new()
                        .texture(0, wgpu::ShaderStages::FRAGMENT)
                        .sampler(1, wgpu::ShaderStages::FRAGMENT),
                ),
            "textured.vert",
            "textured.frag",
        )?;

        let key = GeometryKey(0);
        scene.upload_geometry(&resources, key, &shapes::textured_quad())?;

        let pixels = checkerboard(CHECKER_SIZE, CHECKER_CELL);
        let upload = TextureUpload::rgba8("checkerboard", CHECKER_SIZE, CHECKER_SIZE, &pixels)?;
        let texture = resources.create_texture(&upload)?;

        let scale = AspectScale::new(&resources, 0.8, [0.0, 0.0], "textured scale")?;
        let pipeline = scene.pipeline(id).context("pipeline just registered")?;
        let scale_group = resources.create_bind_group(
            pipeline,
            0,
            &[(0, BindResource::Buffer(scale.buffer()))],
            "textured scale group",
        )?;
        let [view, sampler] = BindResource::texture(&texture);
        let texture_group = resources.create_bind_group(
            pipeline,
            1,
            &[(0, view), (1, sampler)],
            "textured texture group",
        )?;

        scene.push(
            Drawable::pooled(id, key)
                .bind_group(scale_group)
                .bind_group(texture_group)
                .aspect_scale(scale),
        )?;
        Ok(())
    }

    fn setup_cube(&mut self, ctx: &Context<'_>, scene: &mut Scene) -> Result<()> {
        let resources = ctx.resources();
        let id = self.pipeline(
            ctx,
            scene,
            PipelineBuilder::new("cube")
                .vertex_layout(Vertex3::layout())
                .bind_group(BindGroupShape::new().uniform(0, wgpu::ShaderStages::VERTEX))
                .bind_group(BindGroupShape::new().uniform(0, wgpu::ShaderStages::VERTEX))
                .front_face(wgpu::FrontFace::Cw)
                .cull_mode(Some(wgpu::Face::Back)),
            "cube.vert",
            "color.frag",
        )?;

        let key = GeometryKey(0);
        scene.upload_geometry(&resources, key, &shapes::cube())?;

        let mut camera = Camera::new(45f32.to_radians(), ctx.extent().aspect());
        camera.look_at(orbit(0.0), Vec3::ZERO, Vec3::Y);
        let uniform = resources.create_uniform(camera.uniform(), "camera")?;

        let pipeline = scene.pipeline(id).context("pipeline just registered")?;
        let camera_group = resources.create_bind_group(
            pipeline,
            0,
            &[(0, BindResource::Buffer(uniform.buffer()))],
            "camera group",
        )?;

        let mut cubes = Vec::new();
        for (i, transform) in cube_row().iter().enumerate() {
            let model = resources.create_uniform(transform.uniform(), &format!("cube {i} model"))?;
            let model_group = resources.create_bind_group(
                pipeline,
                1,
                &[(0, BindResource::Buffer(model.buffer()))],
                &format!("cube {i} model group"),
            )?;
            cubes.push(
                Drawable::pooled(id, key)
                    .bind_group(camera_group.clone())
                    .bind_group(model_group),
            );
        }
        for cube in cubes {
            scene.push(cube)?;
        }

        self.camera = Some((camera, uniform));
        Ok(())
    }

    fn setup_instanced(&self, ctx: &Context<'_>, scene: &mut Scene) -> Result<()> {
        let resources = ctx.resources();
        let id = self.pipeline(
            ctx,
            scene,
            PipelineBuilder::new("instanced")
                .bind_group(BindGroupShape::new().uniform(0, wgpu::ShaderStages::VERTEX)),
            "instanced.vert",
            "color.frag",
        )?;

        let scale = AspectScale::new(&resources, 0.9, [0.0, 0.0], "instanced scale")?;
        let pipeline = scene.pipeline(id).context("pipeline just registered")?;
        let bind_group = resources.create_bind_group(
            pipeline,
            0,
            &[(0, BindResource::Buffer(scale.buffer()))],
            "instanced group",
        )?;

        scene.push(
            Drawable::procedural(id, 3)
                .bind_group(bind_group)
                .aspect_scale(scale)
                .instances(INSTANCE_COUNT),
        )?;
        Ok(())
    }
}

impl App for Viewer {
    fn setup(&mut self, ctx: &Context<'_>) -> Result<Scene> {
        let mut scene = Scene::new();
        match self.demo {
            Demo::Triangle => self.scaled_shape(ctx, &mut scene, "triangle", &shapes::triangle(), 0.5)?,
            Demo::Circle => self.scaled_shape(ctx, &mut scene, "circle", &shapes::circle(64), 0.6)?,
            Demo::Fullscreen => self.setup_fullscreen(ctx, &mut scene)?,
            Demo::Textured => self.setup_textured(ctx, &mut scene)?,
            Demo::Cube => self.setup_cube(ctx, &mut scene)?,
            Demo::Instanced => self.setup_instanced(ctx, &mut scene)?,
        }

        if scene.drawables().is_empty() {
            bail!("scene `{}` recorded no drawables", self.demo.name());
        }
        log::info!(
            "scene `{}`: {} drawables",
            self.demo.name(),
            scene.drawables().len()
        );
        Ok(scene)
    }

    fn loop_mode(&self) -> LoopMode {
        match self.demo {
            Demo::Cube => LoopMode::Animated,
            _ => LoopMode::Static,
        }
    }

    fn pass_config(&self) -> PassConfig {
        PassConfig::default().with_clear(Color::rgb(0.1, 0.1, 0.1))
    }

    fn update(&mut self, _scene: &mut Scene, ctx: &Context<'_>, tick: &FrameTick) {
        let Some((camera, uniform)) = self.camera.as_mut() else {
            return;
        };
        camera.set_aspect(ctx.extent().aspect());
        camera.look_at(orbit(tick.elapsed), Vec3::ZERO, Vec3::Y);
        uniform.set(camera.uniform());
        uniform.write(ctx.queue());
    }
}
