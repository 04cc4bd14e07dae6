/// JSON-RPC 2.0 postMessage bridge between the React frontend and Bevy.
pub mod web_rpc;
