mod realpath_resolution;
