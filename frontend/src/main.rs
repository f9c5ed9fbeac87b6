use leptos::prelude::*;
use portal_frontend::App;

// wasm32 下用 lol_alloc 作为全局分配器，减小产物体积
#[cfg(target_arch = "wasm32")]
use lol_alloc::{AssumeSingleThreaded, FreeListAllocator};

#[cfg(target_arch = "wasm32")]
#[global_allocator]
static ALLOCATOR: AssumeSingleThreaded<FreeListAllocator> =
    unsafe { AssumeSingleThreaded::new(FreeListAllocator::new()) };

fn main() {
    // panic 信息输出到浏览器控制台
    console_error_panic_hook::set_once();
    mount_to_body(App);
}
