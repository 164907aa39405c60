use std::borrow::Cow;

use anyhow::Result;
use gridcore::{VizConfig, VizMode};
use wgpu::naga::ShaderStage;

/// Compiles the static full-screen triangle vertex shader.
pub(crate) fn compile_vertex_shader(device: &wgpu::Device) -> Result<wgpu::ShaderModule> {
    Ok(device.create_shader_module(wgpu::ShaderModuleDescriptor {
        label: Some("fullscreen triangle vertex"),
        source: wgpu::ShaderSource::Glsl {
            shader: Cow::Borrowed(VERTEX_SHADER_GLSL),
            stage: ShaderStage::Vertex,
            defines: &[],
        },
    }))
}

/// Compiles the assembled fragment program for the configured mode.
pub(crate) fn compile_fragment_shader(
    device: &wgpu::Device,
    source: &str,
) -> Result<wgpu::ShaderModule> {
    Ok(device.create_shader_module(wgpu::ShaderModuleDescriptor {
        label: Some("scene fragment"),
        source: wgpu::ShaderSource::Glsl {
            shader: Cow::Owned(source.to_owned()),
            stage: ShaderStage::Fragment,
            defines: &[],
        },
    }))
}

/// Assembles the fragment source: shared prelude, configuration knobs as
/// defines, then the body for the selected mode.
///
/// Compiling the knobs in keeps the shaders free of dynamic branching on
/// uniforms; a changed scene configuration means a fresh pipeline, which
/// only ever happens at startup.
pub(crate) fn fragment_source(viz: &VizConfig) -> String {
    let body = match viz.mode {
        VizMode::Grid => GRID_FRAGMENT_BODY,
        VizMode::Bars => BARS_FRAGMENT_BODY,
    };
    // Defines must precede the prelude: `fetch_value` expands TEX_WIDTH.
    format!(
        "#version 450\n{defines}\n{FRAGMENT_PRELUDE}\n{body}",
        defines = shader_defines(viz)
    )
}

fn shader_defines(viz: &VizConfig) -> String {
    format!(
        "#define GRID_EDGE {edge}.0\n\
         #define DATA_CAP {cap}.0\n\
         #define TEX_WIDTH {tex_w}\n\
         #define TEX_HEIGHT {tex_h}\n\
         #define MARCH_STEPS {steps}\n\
         #define MARCH_EPSILON {epsilon:?}\n\
         #define MAX_RAY_DISTANCE {max_distance:?}\n",
        edge = viz.grid_edge_count(),
        cap = viz.data_cap,
        tex_w = viz.texture_size.0,
        tex_h = viz.texture_size.1,
        steps = viz.ray_march_steps,
        epsilon = viz.ray_march_epsilon,
        max_distance = viz.max_ray_distance,
    )
}

/// Minimal full-screen triangle vertex shader.
const VERTEX_SHADER_GLSL: &str = r"#version 450
layout(location = 0) out vec2 v_uv;

const vec2 positions[3] = vec2[3](
    vec2(-1.0, -3.0),
    vec2(3.0, 1.0),
    vec2(-1.0, 1.0)
);

void main() {
    uint vertex_index = uint(gl_VertexIndex);
    vec2 pos = positions[vertex_index];
    v_uv = pos * 0.5 + vec2(0.5, 0.5);
    gl_Position = vec4(pos, 0.0, 1.0);
}
";

/// Shared GLSL prologue: interpolants, the scene uniform block, and the
/// packed series texture. The uniform layout must match `SceneUniforms`
/// in `gpu/uniforms.rs` (std140).
const FRAGMENT_PRELUDE: &str = r"layout(location = 0) in vec2 v_uv;
layout(location = 0) out vec4 out_color;

layout(std140, set = 0, binding = 0) uniform SceneParams {
    vec4 _resolution;
    float _time;
    float _time_delta;
    int _frame;
    float _padding0;
} ubo;

#define uResolution ubo._resolution
#define uTime ubo._time

layout(set = 1, binding = 0) uniform texture2D series_texture;
layout(set = 1, binding = 1) uniform sampler series_sampler;

#define SERIES sampler2D(series_texture, series_sampler)

float fetch_value(int index) {
    ivec2 texel = ivec2(index % TEX_WIDTH, index / TEX_WIDTH);
    return texelFetch(SERIES, texel, 0).r;
}
";

/// Mode A: flat grid of brightness cells.
///
/// Cells at or past the data cap go black before any fetch so padding
/// never picks up wrapped values.
const GRID_FRAGMENT_BODY: &str = r"void main() {
    vec2 cell_pos = v_uv * GRID_EDGE;
    vec2 cell_id = floor(cell_pos);
    vec2 cell_uv = fract(cell_pos);

    float cell_index = cell_id.y * GRID_EDGE + cell_id.x;
    if (cell_index < 0.0 || cell_index >= DATA_CAP) {
        out_color = vec4(0.0, 0.0, 0.0, 1.0);
        return;
    }

    float value = fetch_value(int(cell_index));
    float brightness = pow(max(value * 4.5, 0.0), 9.4);

    float border = step(0.06, cell_uv.x) * step(0.016, cell_uv.y)
        * step(cell_uv.x, 0.94) * step(cell_uv.y, 0.94);

    out_color = vec4(vec3(brightness * border), 1.0);
}
";

/// Mode B: ray-marched bar chart over a repeating lattice.
const BARS_FRAGMENT_BODY: &str = r"const float SPACING = 0.1513;
const vec2 BOX_FOOTPRINT = vec2(0.0512, 0.012);
const float HEIGHT_SCALE = 3.0;
const float NORMAL_EPSILON = 0.001;
const float FOG_DENSITY = 0.0039;
const float CAMERA_HEIGHT = 3.0;
const float CAMERA_START_Z = -5.0;
const float DOLLY_SPEED = 0.9;

float sd_box(vec3 p, vec3 b) {
    vec3 q = abs(p) - b;
    return length(max(q, vec3(0.0))) + min(max(q.x, max(q.y, q.z)), 0.0);
}

float map(vec3 p) {
    vec2 cell_id = floor(p.xz / SPACING + GRID_EDGE * 0.5);
    vec3 local = p;
    local.xz = mod(p.xz + GRID_EDGE * SPACING * 0.5, SPACING) - SPACING * 0.5;

    float cell_index = cell_id.y * GRID_EDGE + cell_id.x;
    float wrapped = mod(cell_index, float(TEX_WIDTH * TEX_HEIGHT));
    float value = fetch_value(int(wrapped));

    float height = sqrt(max(value, 0.0)) * HEIGHT_SCALE;
    local.y -= height * 0.5;
    return sd_box(local, vec3(BOX_FOOTPRINT.x, height * 0.5, BOX_FOOTPRINT.y));
}

vec3 calc_normal(vec3 p) {
    float e = NORMAL_EPSILON;
    return normalize(vec3(
        map(p + vec3(e, 0.0, 0.0)) - map(p - vec3(e, 0.0, 0.0)),
        map(p + vec3(0.0, e, 0.0)) - map(p - vec3(0.0, e, 0.0)),
        map(p + vec3(0.0, 0.0, e)) - map(p - vec3(0.0, 0.0, e))
    ));
}

float ray_march(vec3 ro, vec3 rd) {
    float dt = 0.0;
    for (int i = 0; i < MARCH_STEPS; i++) {
        float d = map(ro + rd * dt);
        dt += d;
        if (abs(d) < MARCH_EPSILON || dt > MAX_RAY_DISTANCE) {
            break;
        }
    }
    return dt;
}

void main() {
    vec2 uv = (v_uv - 0.5) * 2.0;
    vec3 ro = vec3(0.0, CAMERA_HEIGHT, CAMERA_START_Z - uTime * DOLLY_SPEED);
    vec3 rd = normalize(vec3(uv, -1.0));

    float dt = ray_march(ro, rd);
    vec3 col = vec3(0.0);
    if (dt < MAX_RAY_DISTANCE) {
        col = calc_normal(ro + rd * dt) * 0.5 + 0.5;
    }

    col = mix(col, vec3(0.0), 1.0 - exp(-FOG_DENSITY * dt * dt * dt));
    out_color = vec4(col, 1.0);
}
";

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn grid_source_compiles_the_knobs_in() {
        let mut viz = VizConfig::new(VizMode::Grid);
        viz.data_cap = 900;
        let source = fragment_source(&viz);
        assert!(source.contains("#define GRID_EDGE 40.0"));
        assert!(source.contains("#define DATA_CAP 900.0"));
        assert!(source.contains("#define TEX_WIDTH 32"));
        assert!(source.contains("cell_uv"));
        assert!(!source.contains("ray_march"));
    }

    #[test]
    fn bars_source_selects_the_march_body() {
        let mut viz = VizConfig::new(VizMode::Bars);
        viz.ray_march_steps = 48;
        let source = fragment_source(&viz);
        assert!(source.contains("#define GRID_EDGE 32.0"));
        assert!(source.contains("#define MARCH_STEPS 48"));
        assert!(source.contains("#define MARCH_EPSILON 0.001"));
        assert!(source.contains("#define MAX_RAY_DISTANCE 20.0"));
        assert!(source.contains("ray_march"));
        assert!(!source.contains("cell_uv"));
    }

    #[test]
    fn prelude_declares_the_uniform_block_once() {
        let source = fragment_source(&VizConfig::new(VizMode::Grid));
        assert_eq!(source.matches("SceneParams").count(), 1);
        assert!(source.starts_with("#version 450"));
    }
}
