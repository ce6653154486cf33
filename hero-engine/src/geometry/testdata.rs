// testdata.rs - Embedded glTF fixtures

// One triangle (0,0,0) (1,0,0) (0,1,0)
const TRIANGLE: &str = "AAAAAAAAAAAAAAAAAACAPwAAAAAAAAAAAAAAAAAAgD8AAAAA";

/// Two nodes sharing the triangle: "Head" with the default material, and
/// `second_node` one unit forward with a blue-grey material.
pub(crate) fn two_node_gltf(second_node: &str) -> String {
    format!(
        r#"{{
  "asset": {{ "version": "2.0" }},
  "scene": 0,
  "scenes": [{{ "nodes": [0, 1] }}],
  "nodes": [
    {{ "name": "Head", "mesh": 0 }},
    {{ "name": "{second_node}", "mesh": 1, "translation": [0.0, 0.0, 1.0] }}
  ],
  "meshes": [
    {{ "primitives": [{{ "attributes": {{ "POSITION": 0 }} }}] }},
    {{ "primitives": [{{ "attributes": {{ "POSITION": 0 }}, "material": 0 }}] }}
  ],
  "materials": [{{ "pbrMetallicRoughness": {{ "baseColorFactor": [0.2, 0.3, 0.4, 1.0] }} }}],
  "accessors": [{{
    "bufferView": 0, "componentType": 5126, "count": 3, "type": "VEC3",
    "min": [0.0, 0.0, 0.0], "max": [1.0, 1.0, 0.0]
  }}],
  "bufferViews": [{{ "buffer": 0, "byteLength": 36 }}],
  "buffers": [{{ "byteLength": 36, "uri": "data:application/octet-stream;base64,{TRIANGLE}" }}]
}}"#
    )
}
