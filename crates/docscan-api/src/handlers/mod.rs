pub mod scan_upload;
