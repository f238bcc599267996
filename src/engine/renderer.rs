use nalgebra::Matrix4;
use web_sys::{HtmlCanvasElement, WebGlBuffer, WebGlProgram, WebGlRenderingContext, WebGlShader, WebGlTexture, WebGlUniformLocation};

use crate::engine::error::{EngineError, EngineResult};
use crate::engine::mesh::{Mesh, VERTEX_STRIDE};

pub type Color = (f32, f32, f32);

const VERTEX_SHADER: &str = r#"
    attribute vec3 aPosition;
    attribute vec3 aColor;
    attribute vec2 aTexCoord;
    uniform mat4 uModelViewProjection;
    varying vec3 vColor;
    varying vec2 vTexCoord;
    void main() {
        gl_Position = uModelViewProjection * vec4(aPosition, 1.0);
        vColor = aColor;
        vTexCoord = aTexCoord;
    }
"#;

const FRAGMENT_SHADER: &str = r#"
    precision mediump float;
    varying vec3 vColor;
    varying vec2 vTexCoord;
    uniform sampler2D uTexture;
    uniform int uUseTexture;
    uniform vec3 uUniformColor;

    void main() {
        vec3 color = uUniformColor * vColor;
        float alpha = 1.0;

        if (uUseTexture == 1) {
            vec4 texColor = texture2D(uTexture, vTexCoord);
            color *= texColor.rgb;
            alpha = texColor.a;
        }

        gl_FragColor = vec4(min(color, vec3(1.0)), alpha);
    }
"#;

const BYTES_PER_VERTEX: i32 = (VERTEX_STRIDE * 4) as i32;

pub struct GpuMesh {
    vertex_buffer: WebGlBuffer,
    index_buffer: WebGlBuffer,
    index_count: i32,
}

pub struct Renderer {
    pub gl: WebGlRenderingContext,
    mvp_location: WebGlUniformLocation,
    u_uniform_color_location: WebGlUniformLocation,
    u_use_texture_location: WebGlUniformLocation,
    pos_loc: u32,
    col_loc: u32,
    tex_loc: u32,
}

impl Renderer {
    pub fn new(gl: WebGlRenderingContext) -> EngineResult<Self> {
        let program = create_program(&gl)?;
        gl.use_program(Some(&program));

        let uniform = |name: &'static str| {
            gl.get_uniform_location(&program, name)
                .ok_or(EngineError::MissingUniform(name))
        };
        let mvp_location = uniform("uModelViewProjection")?;
        let u_uniform_color_location = uniform("uUniformColor")?;
        let u_use_texture_location = uniform("uUseTexture")?;
        let u_texture_location = uniform("uTexture")?;

        let pos_loc = gl.get_attrib_location(&program, "aPosition") as u32;
        let col_loc = gl.get_attrib_location(&program, "aColor") as u32;
        let tex_loc = gl.get_attrib_location(&program, "aTexCoord") as u32;

        gl.uniform1i(Some(&u_texture_location), 0);

        Ok(Renderer {
            gl,
            mvp_location,
            u_uniform_color_location,
            u_use_texture_location,
            pos_loc,
            col_loc,
            tex_loc,
        })
    }

    pub fn upload(&self, mesh: &Mesh) -> EngineResult<GpuMesh> {
        let vertex_buffer = self.gl.create_buffer().ok_or(EngineError::BufferCreation)?;
        let index_buffer = self.gl.create_buffer().ok_or(EngineError::BufferCreation)?;

        self.gl.bind_buffer(WebGlRenderingContext::ARRAY_BUFFER, Some(&vertex_buffer));
        unsafe {
            let vert_array = js_sys::Float32Array::view(&mesh.vertices);
            self.gl.buffer_data_with_array_buffer_view(
                WebGlRenderingContext::ARRAY_BUFFER,
                &vert_array,
                WebGlRenderingContext::STATIC_DRAW
            );
        }

        self.gl.bind_buffer(WebGlRenderingContext::ELEMENT_ARRAY_BUFFER, Some(&index_buffer));
        unsafe {
            let idx_array = js_sys::Uint16Array::view(&mesh.indices);
            self.gl.buffer_data_with_array_buffer_view(
                WebGlRenderingContext::ELEMENT_ARRAY_BUFFER,
                &idx_array,
                WebGlRenderingContext::STATIC_DRAW
            );
        }

        Ok(GpuMesh {
            vertex_buffer,
            index_buffer,
            index_count: mesh.indices.len() as i32,
        })
    }

    pub fn clear(&self, (r, g, b): Color) {
        self.gl.clear_color(r, g, b, 1.0);
        self.gl.clear(WebGlRenderingContext::COLOR_BUFFER_BIT | WebGlRenderingContext::DEPTH_BUFFER_BIT);
    }

    pub fn enable_depth_test(&self) {
        self.gl.enable(WebGlRenderingContext::DEPTH_TEST);
    }

    pub fn disable_depth_test(&self) {
        self.gl.disable(WebGlRenderingContext::DEPTH_TEST);
    }

    pub fn enable_blend(&self) {
        self.gl.enable(WebGlRenderingContext::BLEND);
        self.gl.blend_func(WebGlRenderingContext::SRC_ALPHA, WebGlRenderingContext::ONE_MINUS_SRC_ALPHA);
    }

    pub fn disable_blend(&self) {
        self.gl.disable(WebGlRenderingContext::BLEND);
    }

    pub fn resize(&self, width: i32, height: i32) {
        self.gl.viewport(0, 0, width, height);
    }

    fn bind_mesh(&self, mesh: &GpuMesh) {
        self.gl.bind_buffer(WebGlRenderingContext::ARRAY_BUFFER, Some(&mesh.vertex_buffer));
        self.gl.bind_buffer(WebGlRenderingContext::ELEMENT_ARRAY_BUFFER, Some(&mesh.index_buffer));

        self.gl.vertex_attrib_pointer_with_i32(self.pos_loc, 3, WebGlRenderingContext::FLOAT, false, BYTES_PER_VERTEX, 0);
        self.gl.enable_vertex_attrib_array(self.pos_loc);

        self.gl.vertex_attrib_pointer_with_i32(self.col_loc, 3, WebGlRenderingContext::FLOAT, false, BYTES_PER_VERTEX, 12);
        self.gl.enable_vertex_attrib_array(self.col_loc);

        self.gl.vertex_attrib_pointer_with_i32(self.tex_loc, 2, WebGlRenderingContext::FLOAT, false, BYTES_PER_VERTEX, 24);
        self.gl.enable_vertex_attrib_array(self.tex_loc);
    }

    fn draw_elements(&self, mesh: &GpuMesh, mvp: &Matrix4<f32>) {
        self.gl.uniform_matrix4fv_with_f32_array(Some(&self.mvp_location), false, mvp.as_slice());
        self.gl.draw_elements_with_i32(
            WebGlRenderingContext::TRIANGLES,
            mesh.index_count,
            WebGlRenderingContext::UNSIGNED_SHORT,
            0
        );
    }

    pub fn draw_mesh(&self, mesh: &GpuMesh, model: &Matrix4<f32>, (r, g, b): Color, view_projection: &Matrix4<f32>) {
        self.bind_mesh(mesh);
        self.gl.uniform1i(Some(&self.u_use_texture_location), 0);
        self.gl.uniform3f(Some(&self.u_uniform_color_location), r, g, b);
        self.draw_elements(mesh, &(view_projection * model));
    }

    pub fn draw_textured(&self, mesh: &GpuMesh, texture: &WebGlTexture, model: &Matrix4<f32>, projection: &Matrix4<f32>) {
        self.bind_mesh(mesh);
        self.gl.active_texture(WebGlRenderingContext::TEXTURE0);
        self.gl.bind_texture(WebGlRenderingContext::TEXTURE_2D, Some(texture));
        self.gl.uniform1i(Some(&self.u_use_texture_location), 1);
        self.gl.uniform3f(Some(&self.u_uniform_color_location), 1.0, 1.0, 1.0);
        self.draw_elements(mesh, &(projection * model));
    }

    pub fn create_canvas_texture(&self, canvas: &HtmlCanvasElement) -> EngineResult<WebGlTexture> {
        let texture = self.gl.create_texture().ok_or(EngineError::TextureCreation)?;
        self.upload_canvas(&texture, canvas)?;

        // text sprites are rarely power-of-two sized
        self.gl.tex_parameteri(WebGlRenderingContext::TEXTURE_2D, WebGlRenderingContext::TEXTURE_WRAP_S, WebGlRenderingContext::CLAMP_TO_EDGE as i32);
        self.gl.tex_parameteri(WebGlRenderingContext::TEXTURE_2D, WebGlRenderingContext::TEXTURE_WRAP_T, WebGlRenderingContext::CLAMP_TO_EDGE as i32);
        self.gl.tex_parameteri(WebGlRenderingContext::TEXTURE_2D, WebGlRenderingContext::TEXTURE_MIN_FILTER, WebGlRenderingContext::LINEAR as i32);

        Ok(texture)
    }

    // Replaces the pixels of `texture` with the canvas contents, resizing it as needed.
    pub fn upload_canvas(&self, texture: &WebGlTexture, canvas: &HtmlCanvasElement) -> EngineResult<()> {
        self.gl.bind_texture(WebGlRenderingContext::TEXTURE_2D, Some(texture));
        self.gl.tex_image_2d_with_u32_and_u32_and_canvas(
            WebGlRenderingContext::TEXTURE_2D,
            0,
            WebGlRenderingContext::RGBA as i32,
            WebGlRenderingContext::RGBA,
            WebGlRenderingContext::UNSIGNED_BYTE,
            canvas,
        )?;
        Ok(())
    }

    pub fn delete_texture(&self, texture: &WebGlTexture) {
        self.gl.delete_texture(Some(texture));
    }
}

fn create_program(gl: &WebGlRenderingContext) -> EngineResult<WebGlProgram> {
    let vert_shader = compile_shader(gl, WebGlRenderingContext::VERTEX_SHADER, VERTEX_SHADER)?;
    let frag_shader = compile_shader(gl, WebGlRenderingContext::FRAGMENT_SHADER, FRAGMENT_SHADER)?;

    let program = gl.create_program()
        .ok_or_else(|| EngineError::ProgramLink("Unable to create program".to_string()))?;
    gl.attach_shader(&program, &vert_shader);
    gl.attach_shader(&program, &frag_shader);
    gl.link_program(&program);

    if gl.get_program_parameter(&program, WebGlRenderingContext::LINK_STATUS).as_bool().unwrap_or(false) {
        Ok(program)
    } else {
        Err(EngineError::ProgramLink(gl.get_program_info_log(&program).unwrap_or_default()))
    }
}

fn compile_shader(gl: &WebGlRenderingContext, shader_type: u32, source: &str) -> EngineResult<WebGlShader> {
    let shader = gl.create_shader(shader_type)
        .ok_or_else(|| EngineError::ShaderCompile("Unable to create shader".to_string()))?;
    gl.shader_source(&shader, source);
    gl.compile_shader(&shader);

    if gl.get_shader_parameter(&shader, WebGlRenderingContext::COMPILE_STATUS).as_bool().unwrap_or(false) {
        Ok(shader)
    } else {
        Err(EngineError::ShaderCompile(gl.get_shader_info_log(&shader).unwrap_or_default()))
    }
}
