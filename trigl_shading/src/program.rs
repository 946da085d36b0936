use log::{debug, error};

use crate::driver::{ProgramHandle, ShaderDriver};
use crate::error::ShaderError;
use crate::shader::Shader;
use crate::utils::{identifier, read_info_log};

/// A linked shader program. Deleted when dropped.
pub struct Program<'d, D: ShaderDriver> {
    driver: &'d D,
    handle: ProgramHandle,
}

impl<'d, D: ShaderDriver> Program<'d, D> {
    /// Links `shaders` into a new program, routing fragment output `frag_output` to colour
    /// attachment 0.
    ///
    /// The link status is checked; a failed link returns the driver's info log and the program
    /// object is deleted. On success the shaders are detached again, so they can be dropped
    /// independently of the program.
    pub fn link(driver: &'d D, shaders: &[&Shader<'_, D>], frag_output: &str) -> Result<Self, ShaderError> {
        let output = identifier(frag_output)?;
        let handle = driver.create_program().ok_or(ShaderError::CreateProgram)?;
        let program = Self { driver, handle };

        for shader in shaders {
            driver.attach_shader(handle, shader.handle());
        }

        driver.bind_frag_data_location(handle, 0, &output);
        driver.link_program(handle);

        if !driver.link_status(handle) {
            let diagnostic = read_info_log(|buf| driver.program_info_log(handle, buf));
            error!("shader program link failed (program {}). Info:\n\n{}", handle.id(), diagnostic);

            return Err(ShaderError::Link { diagnostic });
        }

        for shader in shaders {
            driver.detach_shader(handle, shader.handle());
        }

        debug!("linked program {} from {} shaders", handle.id(), shaders.len());
        Ok(program)
    }

    pub fn handle(&self) -> ProgramHandle { self.handle }

    /// Makes this the active program for subsequent draws.
    pub fn bind(&self) {
        self.driver.use_program(self.handle);
    }

    pub fn attribute_location(&self, name: &str) -> Result<u32, ShaderError> {
        let raw = identifier(name)?;

        self.driver
            .attrib_location(self.handle, &raw)
            .ok_or_else(|| ShaderError::MissingAttribute { name: name.to_owned() })
    }
}

impl<D: ShaderDriver> Drop for Program<'_, D> {
    fn drop(&mut self) {
        debug!("deleting program {}", self.handle.id());
        self.driver.delete_program(self.handle);
    }
}
