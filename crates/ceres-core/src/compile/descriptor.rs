//! Build descriptor generation.
//!
//! The external build toolchain is driven by a generated `setup.py` that
//! declares a single native extension target. The descriptor also installs a
//! `build_ext` subclass that strips the interpreter/platform suffix from the
//! output filename, so the published artifact is named `<module>.so` (or
//! `.pyd`) on every variant and the import path stays stable.

/// Filename the descriptor is written under in the build directory.
pub const DESCRIPTOR_FILE: &str = "setup.py";

/// Generate the build descriptor for one test module.
///
/// # Arguments
///
/// * `module` - Normalized extension target name (also the artifact name)
/// * `source_file` - Source filename inside the build directory
pub fn generate_build_descriptor(module: &str, source_file: &str) -> String {
    let mut script = String::new();

    script.push_str("import os\n");
    script.push_str("import sysconfig\n");
    script.push_str("from setuptools import setup\n");
    script.push_str("from setuptools.extension import Extension\n");
    script.push_str("from Cython.Build import cythonize\n");
    script.push_str("from Cython.Distutils import build_ext\n\n");

    script.push_str(&format!(
        "extensions = [Extension(\"{}\", [\"{}\"])]\n\n",
        module, source_file
    ));

    // Suffix stripping: EXT_SUFFIX is e.g. ".cpython-311-x86_64-linux-gnu.so";
    // drop everything between the module name and the bare extension.
    script.push_str("def strip_platform_suffix(filename):\n");
    script.push_str("    name, ext = os.path.splitext(filename)\n");
    script.push_str("    ext_suffix = sysconfig.get_config_var('EXT_SUFFIX')\n");
    script.push_str("    if ext_suffix == ext:\n");
    script.push_str("        return filename\n");
    script.push_str("    ext_suffix = ext_suffix.replace(ext, '')\n");
    script.push_str("    idx = name.find(ext_suffix)\n");
    script.push_str("    if idx == -1:\n");
    script.push_str("        return filename\n");
    script.push_str("    return name[:idx] + ext\n\n");

    script.push_str("class PortableBuildExt(build_ext):\n");
    script.push_str("    def get_ext_filename(self, ext_name):\n");
    script.push_str("        return strip_platform_suffix(super().get_ext_filename(ext_name))\n\n");

    script.push_str(&format!("setup(\n    name=\"{}\",\n", module));
    script.push_str("    ext_modules=cythonize(extensions),\n");
    script.push_str("    cmdclass={'build_ext': PortableBuildExt},\n");
    script.push_str(")\n");

    script
}
