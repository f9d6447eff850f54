//! TypeScript bindings of the portal core, written to `generated/` by the
//! build script for the setup page.
