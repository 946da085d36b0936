//! The tutorial triangle: one red, one green and one blue corner, drawn in normalized device
//! coordinates where `(1, 1)` is the top right and `(-1, -1)` the bottom left.

use crate::vertex::{VertexAttribute, VertexLayout};

pub const TRIANGLE_VERTEX_SOURCE: &str = "#version 150 core
in vec2 position;
in vec3 inColor;
out vec3 Color;
void main() {
    Color = inColor;
    gl_Position = vec4(position, 0.0, 1.0);
}
";

pub const TRIANGLE_FRAGMENT_SOURCE: &str = "#version 150 core
in vec3 Color;
out vec4 outColor;
void main() {
    outColor = vec4(Color, 1.0);
}
";

pub const TRIANGLE_FRAG_OUTPUT: &str = "outColor";

#[rustfmt::skip]
pub const TRIANGLE_VERTICES: [f32; 15] = [
    // Position     Color
     0.0,  0.5,     1.0, 0.0, 0.0,
     0.5, -0.5,     0.0, 1.0, 0.0,
    -0.5, -0.5,     0.0, 0.0, 1.0,
];

pub const TRIANGLE_LAYOUT: VertexLayout = VertexLayout::new(
    &[
        VertexAttribute::new("position", 2, 0),
        VertexAttribute::new("inColor", 3, 2),
    ],
    5,
);
